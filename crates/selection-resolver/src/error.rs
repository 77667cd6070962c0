// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::Pos;
use async_graphql_value::Name;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("{0}")]
    QueryParsingFailed(String, Pos),

    #[error("Schema could not be parsed: {0}")]
    SchemaParsingFailed(String, Pos),

    #[error("Fragment definition '{0}' not found")]
    FragmentDefinitionNotFound(String, Pos),

    #[error("Field '{0}' is not valid for type '{1}'")]
    InvalidField(String, String, Pos),

    #[error("Selection set too deep")]
    SelectionSetTooDeep(Pos),

    #[error("Root type '{0}' is not defined in the schema")]
    RootTypeNotFound(String),

    #[error("No operation found")]
    NoOperationFound,

    #[error("Must provide operation name if query contains multiple operations")]
    MultipleOperationsNoOperationName,

    #[error("operationName '{0}' doesn't match any operation")]
    MultipleOperationsUnmatchedOperationName(String),

    #[error("Variable '{0}' not found")]
    VariableNotFound(Name),

    #[error("Value could not be deserialized: {0}")]
    MalformedValue(#[from] serde_json::Error),
}

impl SelectionError {
    pub fn position(&self) -> Option<Pos> {
        match self {
            SelectionError::QueryParsingFailed(_, pos)
            | SelectionError::SchemaParsingFailed(_, pos)
            | SelectionError::FragmentDefinitionNotFound(_, pos)
            | SelectionError::InvalidField(_, _, pos)
            | SelectionError::SelectionSetTooDeep(pos) => Some(*pos),
            SelectionError::RootTypeNotFound(_)
            | SelectionError::NoOperationFound
            | SelectionError::MultipleOperationsNoOperationName
            | SelectionError::MultipleOperationsUnmatchedOperationName(_)
            | SelectionError::VariableNotFound(_)
            | SelectionError::MalformedValue(_) => None,
        }
    }
}

impl From<async_graphql_parser::Error> for SelectionError {
    fn from(error: async_graphql_parser::Error) -> Self {
        let pos = error.positions().next().unwrap_or_default();
        SelectionError::QueryParsingFailed(error.to_string(), pos)
    }
}
