// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Access to configuration values supplied through environment variables.
//!
//! Code that needs configuration takes a `&dyn Environment` instead of reading `std::env`
//! directly, so that tests can supply values through a [`MapEnvironment`].

use std::collections::HashMap;
use std::str::FromStr;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Parse the value of `key` as a positive integer. An unset key is `Ok(None)`.
    fn get_positive_usize(&self, key: &'static str) -> Result<Option<usize>, EnvError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match usize::from_str(value.trim()) {
                Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
                _ => Err(EnvError::InvalidNumber {
                    env_key: key,
                    env_value: value,
                }),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid env value {env_value} for {env_key}: expected a positive integer")]
    InvalidNumber {
        env_key: &'static str,
        env_value: String,
    },

    #[error("Invalid env value {env_value} for {env_key}: {message}")]
    InvalidEnum {
        env_key: &'static str,
        env_value: String,
        message: String,
    },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment.
#[derive(Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(values: [(&str, &str); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }
}
