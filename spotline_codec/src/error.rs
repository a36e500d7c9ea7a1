// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Codec failure conditions.

use alloc::string::String;
use thiserror::Error;

/// Errors produced while encoding or decoding an entity tree.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record's type tag has no registered factory. The codec never
    /// guesses or substitutes a default type.
    #[error("unknown entity type tag {0:?}")]
    UnknownEntityType(String),
    /// A record omitted a field its tag requires.
    #[error("field {field:?} is required for {tag:?} records")]
    MissingField {
        /// The record's type tag.
        tag: String,
        /// The missing field's wire name.
        field: &'static str,
    },
    /// The JSON layer failed to parse or print.
    #[error("JSON codec failed: {0}")]
    Json(#[from] serde_json::Error),
}
