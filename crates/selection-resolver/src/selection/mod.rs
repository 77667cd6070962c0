// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn the selection sets of a query into trees of [`ResolvedField`]s.
//!
//! Fragment spreads and inline fragments are inlined ([`FragmentExpander`]), occurrences of the
//! same response key are merged ([`merge`]), and this is repeated down the tree
//! ([`SelectionTreeBuilder`]). [`FieldPath`] addresses fields in the result.

pub mod builder;
pub mod expander;
pub mod field;
pub mod fragment_table;
pub mod merger;
pub mod path;

pub use builder::SelectionTreeBuilder;
pub use expander::{ExpandedField, FragmentExpander};
pub use field::{ResolvedField, lookup_in};
pub use fragment_table::FragmentTable;
pub use merger::merge;
pub use path::{FieldIdentifier, FieldPath, FieldPathParseError};
