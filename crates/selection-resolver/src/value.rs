// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Argument values and directive applications attached to resolved fields.
//!
//! Values are kept exactly as written in the query (they may still refer to variables). Resolver
//! code turns them into concrete values with [`ArgumentValue::deserialize`]; the selection
//! machinery itself never looks inside them.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use async_graphql_parser::{
    Positioned,
    types::{ConstDirective, Directive, DirectiveDefinition, InputValueDefinition},
};
use async_graphql_value::{ConstValue, Name, Value};
use indexmap::IndexMap;
use serde::{Serialize, Serializer, de::DeserializeOwned};
use serde_json::{Map, Value as JsonValue};

use crate::error::SelectionError;

pub type Variables = HashMap<Name, ConstValue>;

pub type Arguments = IndexMap<Name, ArgumentValue>;

/// Convert the variables of a request payload.
pub fn variables_from_json(variables: Map<String, JsonValue>) -> Result<Variables, SelectionError> {
    variables
        .into_iter()
        .map(|(name, value)| -> Result<_, SelectionError> {
            Ok((Name::new(name), ConstValue::from_json(value)?))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentValue(Value);

impl ArgumentValue {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The value as written, possibly referring to variables.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Substitute variables to obtain a constant value.
    pub fn deserialize(&self, variables: &Variables) -> Result<ConstValue, SelectionError> {
        self.0.clone().into_const_with(|name| {
            variables
                .get(&name)
                .cloned()
                .ok_or(SelectionError::VariableNotFound(name))
        })
    }

    pub fn deserialize_into<T: DeserializeOwned>(
        &self,
        variables: &Variables,
    ) -> Result<T, SelectionError> {
        let json = self.deserialize(variables)?.into_json()?;
        Ok(serde_json::from_value(json)?)
    }
}

impl From<ConstValue> for ArgumentValue {
    fn from(value: ConstValue) -> Self {
        Self(value.into_value())
    }
}

impl Display for ArgumentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ArgumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// A directive applied to a field, such as `@cached(ttl: 10)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectiveApplication {
    pub name: Name,
    pub arguments: Arguments,
}

impl DirectiveApplication {
    /// Directive as written in a query, with defaults from `definition` for arguments not given.
    pub(crate) fn from_query(
        directive: &Positioned<Directive>,
        definition: Option<&DirectiveDefinition>,
    ) -> Self {
        let arguments = directive
            .node
            .arguments
            .iter()
            .map(|(name, value)| (name.node.clone(), ArgumentValue::new(value.node.clone())))
            .collect();

        Self {
            name: directive.node.name.node.clone(),
            arguments: with_defaults(arguments, definition.map(|d| &d.arguments[..])),
        }
    }

    /// Directive attached to a schema element (always constant).
    pub(crate) fn from_schema(
        directive: &Positioned<ConstDirective>,
        definition: Option<&DirectiveDefinition>,
    ) -> Self {
        let arguments = directive
            .node
            .arguments
            .iter()
            .map(|(name, value)| (name.node.clone(), ArgumentValue::from(value.node.clone())))
            .collect();

        Self {
            name: directive.node.name.node.clone(),
            arguments: with_defaults(arguments, definition.map(|d| &d.arguments[..])),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentValue> {
        self.arguments.get(name)
    }
}

/// Append the default of every declared argument missing from `arguments` (in declaration order).
pub(crate) fn with_defaults(
    mut arguments: Arguments,
    declared: Option<&[Positioned<InputValueDefinition>]>,
) -> Arguments {
    for declared in declared.unwrap_or_default() {
        let declared = &declared.node;
        if let Some(default_value) = &declared.default_value {
            if !arguments.contains_key(&declared.name.node) {
                arguments.insert(
                    declared.name.node.clone(),
                    ArgumentValue::from(default_value.node.clone()),
                );
            }
        }
    }
    arguments
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DirectiveList(Vec<DirectiveApplication>);

impl DirectiveList {
    pub fn new(directives: Vec<DirectiveApplication>) -> Self {
        Self(directives)
    }

    /// The first application of the named directive.
    pub fn get(&self, name: &str) -> Option<&DirectiveApplication> {
        self.0.iter().find(|directive| directive.name.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectiveApplication> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn extend(&mut self, other: DirectiveList) {
        self.0.extend(other.0)
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a DirectiveApplication;
    type IntoIter = std::slice::Iter<'a, DirectiveApplication>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
