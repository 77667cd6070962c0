// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::{IndexMap, map::Entry};

use super::field::ResolvedField;

/// Merge field occurrences sharing a response key and asserted type, recursively.
///
/// The result follows the order of first occurrences. Each merged field keeps the identity and
/// arguments of its first occurrence, concatenates the directives of all occurrences, and merges
/// the union of their children by the same rule.
pub fn merge(occurrences: impl IntoIterator<Item = ResolvedField>) -> Vec<ResolvedField> {
    let mut merged: IndexMap<_, ResolvedField> = IndexMap::new();

    for occurrence in occurrences {
        match merged.entry(occurrence.merge_key()) {
            Entry::Occupied(mut entry) => entry.get_mut().absorb(occurrence),
            Entry::Vacant(entry) => {
                entry.insert(occurrence);
            }
        }
    }

    merged
        .into_values()
        .map(|field| field.map_children(merge))
        .collect()
}
