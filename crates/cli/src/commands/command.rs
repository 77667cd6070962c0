// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use common::env::Environment;

pub trait CommandDefinition {
    fn command(&self) -> Command;

    fn execute(&self, matches: &ArgMatches, env: &dyn Environment) -> Result<()>;
}

pub struct SubcommandDefinition {
    pub name: &'static str,
    pub about: &'static str,
    pub command_definitions: Vec<Box<dyn CommandDefinition>>,
}

impl SubcommandDefinition {
    pub fn new(
        name: &'static str,
        about: &'static str,
        command_definitions: Vec<Box<dyn CommandDefinition>>,
    ) -> Self {
        Self {
            name,
            about,
            command_definitions,
        }
    }
}

impl CommandDefinition for SubcommandDefinition {
    fn command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true)
            .subcommands(
                self.command_definitions
                    .iter()
                    .map(|command_definition| command_definition.command()),
            )
    }

    fn execute(&self, matches: &ArgMatches, env: &dyn Environment) -> Result<()> {
        let (subcommand_name, subcommand_matches) = matches
            .subcommand()
            .ok_or_else(|| anyhow!("No subcommand given"))?;

        for command_definition in &self.command_definitions {
            if command_definition.command().get_name() == subcommand_name {
                return command_definition.execute(subcommand_matches, env);
            }
        }

        Err(anyhow!("Unknown subcommand: {}", subcommand_name))
    }
}

pub fn get_required<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    arg_id: &str,
) -> Result<T> {
    get(matches, arg_id).ok_or_else(|| anyhow!("Required argument `{}` is not present", arg_id))
}

pub fn get<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, arg_id: &str) -> Option<T> {
    matches.get_one::<T>(arg_id).cloned()
}

pub fn schema_file_arg() -> Arg {
    Arg::new("schema")
        .help("The path to the GraphQL schema (SDL) file.")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(1)
}

pub fn query_file_arg() -> Arg {
    Arg::new("query")
        .help("The path to the file containing the query document.")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(2)
}

pub fn operation_name_arg() -> Arg {
    Arg::new("operation")
        .help("Operation to resolve")
        .long_help("Name of the operation to resolve. Required if the document has more than one operation.")
        .long("operation")
        .required(false)
        .num_args(1)
}

pub fn variables_arg() -> Arg {
    Arg::new("variables")
        .help("Variables as a JSON object")
        .long("variables")
        .required(false)
        .num_args(1)
}

pub fn path_arg() -> Arg {
    Arg::new("path")
        .help("Print only the field at this path")
        .long_help(
            "Print only the field at this path: dot-separated components, each `name` or `alias:name` (for example `concerts.mainVenue:venue.name`).",
        )
        .long("path")
        .required(false)
        .num_args(1)
}
