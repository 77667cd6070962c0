// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Log filter directives, following the same conventions as `RUST_LOG`.
pub const SELECTION_LOG: &str = "SELECTION_LOG";

/// "ignore" (default) or "error": what to do with a spread of an unknown fragment.
pub const SELECTION_MISSING_FRAGMENT: &str = "SELECTION_MISSING_FRAGMENT";

/// Maximum nesting depth of a resolved selection (root fields have depth 1). Unlimited if unset.
pub const SELECTION_MAX_DEPTH: &str = "SELECTION_MAX_DEPTH";
