// SPDX-License-Identifier: BUSL-1.1
//! # Error Types
//!
//! Errors raised while naming resources or shaping payloads. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for `inventa-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A resource path segment did not name any known resource.
    #[error("unknown resource: {0:?}")]
    UnknownResource(String),

    /// A payload did not have the shape an operation requires
    /// (e.g. an update patch that does not serialize to a JSON object).
    #[error("payload shape error: {0}")]
    PayloadShape(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
