// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolution of query selections.
//!
//! An [`OperationResolver`] picks the operation of a parsed query document and builds the tree of
//! [`ResolvedField`]s it selects: fragments are inlined, fields sharing a response key are merged,
//! and fields reached through type conditions on unions and interfaces carry the concrete type
//! they were selected under. Resolvers then inspect that tree through a [`ResolutionContext`].

pub mod config;
pub mod context;
pub mod error;
pub mod operation;
pub mod schema;
pub mod selection;
pub mod value;

pub use config::{MissingFragmentPolicy, ResolverConfig};
pub use context::ResolutionContext;
pub use error::SelectionError;
pub use operation::{OperationResolver, ResolvedOperation};
pub use schema::Schema;
pub use selection::{
    FieldIdentifier, FieldPath, FieldPathParseError, FragmentTable, ResolvedField,
    SelectionTreeBuilder,
};
pub use value::{ArgumentValue, Arguments, DirectiveApplication, DirectiveList, Variables};
