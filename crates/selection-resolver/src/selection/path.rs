// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use async_graphql_value::Name;
use thiserror::Error;

use super::field::ResolvedField;

/// Identifies a child field during path lookup: its name, and optionally the exact alias it must
/// have been selected under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentifier {
    name: Name,
    alias: Option<Name>,
}

impl FieldIdentifier {
    /// Matches a field with this name under any alias.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Name::new(name),
            alias: None,
        }
    }

    /// Matches a field with this name selected under exactly this alias. An unaliased field has
    /// its name as alias.
    pub fn aliased(name: impl AsRef<str>, alias: impl AsRef<str>) -> Self {
        Self {
            name: Name::new(name),
            alias: Some(Name::new(alias)),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn alias(&self) -> Option<&Name> {
        self.alias.as_ref()
    }

    pub fn matches(&self, field: &ResolvedField) -> bool {
        field.name() == &self.name
            && self
                .alias
                .as_ref()
                .is_none_or(|alias| field.alias() == alias)
    }
}

impl Display for FieldIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias}:{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A path from some field down to one of its descendants.
///
/// The textual form separates components with `.`; a component is either `name` (any alias) or
/// `alias:name`, for example `concert.mainVenue:venue.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<FieldIdentifier>);

impl FieldPath {
    pub fn new(identifiers: Vec<FieldIdentifier>) -> Self {
        Self(identifiers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldIdentifier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldPath {
    type Item = &'a FieldIdentifier;
    type IntoIter = std::slice::Iter<'a, FieldIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<FieldIdentifier>> for FieldPath {
    fn from(identifiers: Vec<FieldIdentifier>) -> Self {
        Self(identifiers)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldPathParseError {
    #[error("Empty component at position {0} in field path '{1}'")]
    EmptyComponent(usize, String),

    #[error("Malformed component '{0}' in field path: expected `name` or `alias:name`")]
    MalformedComponent(String),
}

impl FromStr for FieldPath {
    type Err = FieldPathParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        if path.is_empty() {
            return Ok(FieldPath::default());
        }

        path.split('.')
            .enumerate()
            .map(|(index, component)| {
                let component = component.trim();
                if component.is_empty() {
                    return Err(FieldPathParseError::EmptyComponent(index, path.to_string()));
                }

                match component.split_once(':') {
                    None => Ok(FieldIdentifier::new(component)),
                    Some((alias, name)) => {
                        let (alias, name) = (alias.trim(), name.trim());
                        if alias.is_empty() || name.is_empty() || name.contains(':') {
                            Err(FieldPathParseError::MalformedComponent(
                                component.to_string(),
                            ))
                        } else {
                            Ok(FieldIdentifier::aliased(name, alias))
                        }
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldPath)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, identifier) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{identifier}")?;
        }
        Ok(())
    }
}
