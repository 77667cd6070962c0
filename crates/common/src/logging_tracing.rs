// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The resolver code is instrumented with Rust's `tracing` framework.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the values of
//! the `SELECTION_LOG` environment variable which follows the same conventions as `RUST_LOG`. This
//! will provide console logging (on stderr, so that it does not interleave with command output).

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::env_const::SELECTION_LOG;

/// Initialize the tracing subscriber.
///
/// Fails if a global subscriber has already been installed.
pub fn init() -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(SELECTION_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Tracing subscriber could not be installed: {0}")]
    AlreadyInitialized(String),
}
