// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    operation::ResolvedOperation,
    selection::{FieldPath, FragmentTable, ResolvedField},
    value::Variables,
};

/// The part of a request's state that resolvers use to inspect what was selected.
///
/// Attaching a selection returns a new context and leaves the original untouched, so each branch
/// of execution (including branches running concurrently) carries its own active selection.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    operation: &'a ResolvedOperation,
    current_selection: Option<&'a ResolvedField>,
    root_selection: Option<&'a ResolvedField>,
}

impl<'a> ResolutionContext<'a> {
    /// A context with no active selection (the state before any field is resolved).
    pub fn new(operation: &'a ResolvedOperation) -> Self {
        Self {
            operation,
            current_selection: None,
            root_selection: None,
        }
    }

    /// A context with `field` as the active selection. If there is no root selection yet, `field`
    /// becomes the root as well.
    pub fn with_selection(&self, field: &'a ResolvedField) -> ResolutionContext<'a> {
        Self {
            operation: self.operation,
            current_selection: Some(field),
            root_selection: self.root_selection.or(Some(field)),
        }
    }

    /// A context with `field` as both the root and the active selection.
    pub fn with_root_selection(&self, field: &'a ResolvedField) -> ResolutionContext<'a> {
        Self {
            operation: self.operation,
            current_selection: Some(field),
            root_selection: Some(field),
        }
    }

    /// The field whose resolver is running, or `None` outside of field resolution.
    pub fn current_selection(&self) -> Option<&'a ResolvedField> {
        self.current_selection
    }

    /// The root field of the branch being resolved, or `None` outside of field resolution.
    pub fn root_selection(&self) -> Option<&'a ResolvedField> {
        self.root_selection
    }

    pub fn operation(&self) -> &'a ResolvedOperation {
        self.operation
    }

    pub fn fragments(&self) -> &'a FragmentTable {
        &self.operation.fragments
    }

    pub fn variables(&self) -> &'a Variables {
        &self.operation.variables
    }

    /// Look up `path` relative to the current selection.
    pub fn lookup(&self, path: &FieldPath) -> Option<&'a ResolvedField> {
        self.current_selection?.lookup_path(path)
    }
}
