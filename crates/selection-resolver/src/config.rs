// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use common::{
    env::{EnvError, Environment},
    env_const::{SELECTION_MAX_DEPTH, SELECTION_MISSING_FRAGMENT},
};

/// What to do when a fragment spread names a fragment that the document does not define.
///
/// Upstream validation normally rejects such documents, so this only matters for documents that
/// skipped validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFragmentPolicy {
    /// The spread contributes no fields.
    #[default]
    Ignore,
    /// Building fails with [`crate::SelectionError::FragmentDefinitionNotFound`].
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub missing_fragment: MissingFragmentPolicy,
    /// Maximum nesting depth of resolved fields (root fields have depth 1).
    pub max_depth: Option<usize>,
}

impl ResolverConfig {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        let missing_fragment = match env.get(SELECTION_MISSING_FRAGMENT).as_deref() {
            None | Some("ignore") => MissingFragmentPolicy::Ignore,
            Some("error") => MissingFragmentPolicy::Error,
            Some(other) => {
                return Err(EnvError::InvalidEnum {
                    env_key: SELECTION_MISSING_FRAGMENT,
                    env_value: other.to_string(),
                    message: "Must be one of 'ignore' or 'error'".to_string(),
                });
            }
        };

        Ok(Self {
            missing_fragment,
            max_depth: env.get_positive_usize(SELECTION_MAX_DEPTH)?,
        })
    }
}
