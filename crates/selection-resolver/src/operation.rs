// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Positioned,
    types::{
        DocumentOperations, ExecutableDocument, OperationDefinition, OperationType,
        VariableDefinition,
    },
};
use async_graphql_value::Name;
use serde_json::{Map, Value as JsonValue};
use tracing::instrument;

use crate::{
    config::ResolverConfig,
    error::SelectionError,
    schema::Schema,
    selection::{FieldPath, FragmentTable, ResolvedField, SelectionTreeBuilder, lookup_in},
    value::{Variables, variables_from_json},
};

/// Prepares the operation of a query document for execution.
pub struct OperationResolver<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, JsonValue>>,
    config: ResolverConfig,
}

impl<'a> OperationResolver<'a> {
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, JsonValue>>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            config,
        }
    }

    /// Parse `query` and resolve its operation.
    pub fn resolve_str(self, query: &str) -> Result<ResolvedOperation, SelectionError> {
        let document = async_graphql_parser::parse_query(query)?;
        self.resolve(document)
    }

    /// Pick the operation to run and build its selection tree.
    ///
    /// - Either there is only one operation, or the operation name matches one of the operations
    ///   in the document
    /// - Variables take the provided value, or else the declared default
    /// - Fragments are inlined, and the fields of every level merged
    #[instrument(
        name = "OperationResolver::resolve",
        skip_all,
        fields(operation_name = ?self.operation_name)
    )]
    pub fn resolve(self, document: ExecutableDocument) -> Result<ResolvedOperation, SelectionError> {
        let (operation_name, operation) = match document.operations {
            DocumentOperations::Single(operation) => Ok((self.operation_name, operation)),
            DocumentOperations::Multiple(mut operations) => {
                if operations.is_empty() {
                    Err(SelectionError::NoOperationFound)
                } else {
                    match self.operation_name {
                        // A named operation is parsed into `Multiple` even when it is alone
                        None if operations.len() == 1 => operations
                            .into_iter()
                            .next()
                            .map(|(name, operation)| (Some(name.to_string()), operation))
                            .ok_or(SelectionError::NoOperationFound),
                        None => Err(SelectionError::MultipleOperationsNoOperationName),
                        Some(operation_name) => {
                            match operations.remove(&Name::new(&operation_name)) {
                                None => Err(
                                    SelectionError::MultipleOperationsUnmatchedOperationName(
                                        operation_name,
                                    ),
                                ),
                                Some(operation) => Ok((Some(operation_name), operation)),
                            }
                        }
                    }
                }
            }
        }?;

        let root_type_name = self.schema.root_type_name(operation.node.ty).clone();
        if self.schema.type_definition(&root_type_name).is_none() {
            return Err(SelectionError::RootTypeNotFound(root_type_name.to_string()));
        }

        let variables = resolve_variables(
            self.variables.unwrap_or_default(),
            &operation.node.variable_definitions,
        )?;

        let fragments = FragmentTable::new(document.fragments);

        let fields = SelectionTreeBuilder::new(self.schema, &fragments, &self.config)
            .build(&operation.node.selection_set, &root_type_name)?;

        Ok(ResolvedOperation {
            name: operation_name,
            typ: operation.node.ty,
            root_type_name,
            fields,
            fragments,
            variables,
            definition: operation,
        })
    }
}

fn resolve_variables(
    provided: Map<String, JsonValue>,
    variable_definitions: &[Positioned<VariableDefinition>],
) -> Result<Variables, SelectionError> {
    let mut provided = variables_from_json(provided)?;

    Ok(variable_definitions
        .iter()
        .filter_map(|definition| {
            let name = &definition.node.name.node;
            provided
                .remove(name)
                .or_else(|| {
                    definition
                        .node
                        .default_value
                        .as_ref()
                        .map(|default| default.node.clone())
                })
                .map(|value| (name.clone(), value))
        })
        .collect())
}

/// An operation with its selection tree built.
#[derive(Debug)]
pub struct ResolvedOperation {
    pub name: Option<String>,
    /// The type of operation.
    pub typ: OperationType,
    /// The schema type the root fields are selected on.
    pub root_type_name: Name,
    /// The operation's fields (individual queries or mutations).
    pub fields: Vec<ResolvedField>,
    pub fragments: FragmentTable,
    pub variables: Variables,
    pub definition: Positioned<OperationDefinition>,
}

impl ResolvedOperation {
    pub fn lookup(&self, path: &FieldPath) -> Option<&ResolvedField> {
        lookup_in(&self.fields, path)
    }

    /// Names of the fields selected directly under `path` (the root fields for an empty path).
    /// Empty when nothing is selected at `path`.
    pub fn field_names(&self, path: &FieldPath) -> Vec<&Name> {
        if path.is_empty() {
            self.fields.iter().map(|field| field.name()).collect()
        } else {
            self.lookup(path)
                .map(|field| field.child_names())
                .unwrap_or_default()
        }
    }
}
