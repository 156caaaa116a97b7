// SPDX-License-Identifier: BUSL-1.1
//! # Application Error
//!
//! Maps stub failures to structured HTTP responses:
//! `{ "error": { "code", "message", "fields"? } }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventa_core::CoreError;
use inventa_schema::{FieldErrors, SchemaValidationError, ROOT_FIELD};
use thiserror::Error;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown resource segment or record id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Body rejected. `fields` maps each offending field to its messages.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        fields: Option<FieldErrors>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A validation failure not attributable to a single field.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<SchemaValidationError> for AppError {
    fn from(e: SchemaValidationError) -> Self {
        match e {
            SchemaValidationError::ValidationFailed {
                schema_name,
                fields,
            } => Self::Validation {
                message: format!("payload does not satisfy {schema_name}"),
                fields: Some(fields),
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownResource(segment) => Self::NotFound(format!("resource '{segment}'")),
            CoreError::PayloadShape(msg) => Self::invalid_body(msg),
            CoreError::Serialization(e) => Self::invalid_body(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut error = serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        match &self {
            AppError::Validation {
                fields: Some(fields),
                ..
            } => {
                error["fields"] = serde_json::to_value(fields).unwrap_or_default();
            }
            AppError::Validation { message, .. } => {
                error["fields"] = serde_json::json!({ (ROOT_FIELD): [message] });
            }
            _ => {}
        }
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, axum::Json(serde_json::json!({ "error": error }))).into_response()
    }
}
