// SPDX-License-Identifier: BUSL-1.1
//! Accessor-layer error types.

use inventa_core::CoreError;
use inventa_schema::{FieldErrors, SchemaValidationError};

/// Errors from backend calls and payload preparation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Backend returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// Payload could not be shaped for dispatch.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Payload rejected by its schema before dispatch.
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
    /// The HTTP client could not be constructed.
    #[error("client init error: {0}")]
    Client(String),
}

impl ApiError {
    /// HTTP status of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field-level errors of a schema rejection, if this is one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(e) => e.field_errors(),
            _ => None,
        }
    }
}
