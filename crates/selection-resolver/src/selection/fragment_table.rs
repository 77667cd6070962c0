// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use async_graphql_parser::{Positioned, types::FragmentDefinition};
use async_graphql_value::Name;

/// Named fragment definitions accompanying one operation.
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    fragments: HashMap<Name, Positioned<FragmentDefinition>>,
}

impl FragmentTable {
    /// Use the fragments of a parsed document as they are (the parser already keyed them by name).
    pub fn new(fragments: HashMap<Name, Positioned<FragmentDefinition>>) -> Self {
        Self { fragments }
    }

    /// If two definitions share a name, the later one wins.
    pub fn build(
        definitions: impl IntoIterator<Item = (Name, Positioned<FragmentDefinition>)>,
    ) -> Self {
        Self {
            fragments: definitions.into_iter().collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments.get(name).map(|fragment| &fragment.node)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
