// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::{ArgMatches, Command};
use common::env::Environment;
use selection_resolver::{FieldPath, OperationResolver, ResolverConfig, Schema};
use serde_json::{Map, Value};
use tracing::debug;

use super::command::{
    CommandDefinition, get, get_required, operation_name_arg, path_arg, query_file_arg,
    schema_file_arg, variables_arg,
};

pub struct ResolveCommandDefinition {}

impl CommandDefinition for ResolveCommandDefinition {
    fn command(&self) -> Command {
        Command::new("resolve")
            .about("Print the fields a query selects, after inlining fragments and merging fields")
            .arg(schema_file_arg())
            .arg(query_file_arg())
            .arg(operation_name_arg())
            .arg(variables_arg())
            .arg(path_arg())
    }

    fn execute(&self, matches: &ArgMatches, env: &dyn Environment) -> Result<()> {
        let schema_path: PathBuf = get_required(matches, "schema")?;
        let query_path: PathBuf = get_required(matches, "query")?;

        let request = ResolveRequest {
            operation_name: get(matches, "operation"),
            variables: get(matches, "variables"),
            path: get(matches, "path"),
        };

        let config = ResolverConfig::from_env(env)?;
        debug!(?config, "Resolving selections");

        let output = resolve_files(&schema_path, &query_path, request, config)?;
        println!("{output}");

        Ok(())
    }
}

struct ResolveRequest {
    operation_name: Option<String>,
    variables: Option<String>,
    path: Option<String>,
}

fn resolve_files(
    schema_path: &Path,
    query_path: &Path,
    request: ResolveRequest,
    config: ResolverConfig,
) -> Result<String> {
    let sdl = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read schema file {}", schema_path.display()))?;
    let query = fs::read_to_string(query_path)
        .with_context(|| format!("Failed to read query file {}", query_path.display()))?;

    let schema = Schema::parse(&sdl)?;

    let variables = request
        .variables
        .map(|variables| {
            serde_json::from_str::<Map<String, Value>>(&variables)
                .context("Variables must be a JSON object")
        })
        .transpose()?;

    let operation = OperationResolver::new(&schema, request.operation_name, variables, config)
        .resolve_str(&query)?;

    let output = match request.path {
        Some(path) => {
            let field_path: FieldPath = path.parse()?;
            let field = operation
                .lookup(&field_path)
                .ok_or_else(|| anyhow!("No field selected at path `{path}`"))?;
            serde_json::to_string_pretty(field)?
        }
        None => serde_json::to_string_pretty(&operation.fields)?,
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    const SDL: &str = r#"
        type Query {
            concerts(limit: Int): [Concert!]!
        }

        type Concert {
            id: Int!
            title: String
        }
    "#;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn resolve(query: &str, variables: Option<&str>, path: Option<&str>) -> Result<String> {
        let schema = write_file(SDL);
        let query = write_file(query);

        resolve_files(
            schema.path(),
            query.path(),
            ResolveRequest {
                operation_name: None,
                variables: variables.map(str::to_string),
                path: path.map(str::to_string),
            },
            ResolverConfig::default(),
        )
    }

    #[test]
    fn whole_tree() {
        let output = resolve("{ concerts { id t: title } }", None, None).unwrap();

        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json[0]["name"], "concerts");
        assert_eq!(json[0]["children"][1]["alias"], "t");
        assert_eq!(json[0]["children"][1]["type_name"], "String");
    }

    #[test]
    fn single_path() {
        let output = resolve(
            "query($limit: Int) { concerts(limit: $limit) { id t: title } }",
            Some(r#"{ "limit": 3 }"#),
            Some("concerts.t:title"),
        )
        .unwrap();

        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["name"], "title");

        let error = resolve("{ concerts { id } }", None, Some("concerts.title")).unwrap_err();
        assert_eq!(error.to_string(), "No field selected at path `concerts.title`");
    }

    #[test]
    fn invalid_variables() {
        assert!(resolve("{ concerts { id } }", Some("[1, 2]"), None).is_err());
    }
}
