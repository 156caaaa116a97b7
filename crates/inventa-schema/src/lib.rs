// SPDX-License-Identifier: BUSL-1.1
//! # inventa-schema: Payload Schema Validation
//!
//! Runtime JSON Schema validation of resource payloads before they are
//! dispatched to the backend (client side) or stored (stub side).
//!
//! ## Design
//!
//! Schemas are embedded in the crate (`schemas/*.schema.json`) and compiled
//! once by [`SchemaValidator::new`]. Only resources with a published schema
//! are checked; currently that is the Inventory payload.
//!
//! Failures are never a generic error string. [`SchemaValidationError::ValidationFailed`]
//! carries a [`FieldErrors`] set that maps each offending field to its
//! messages, so a form can route each message to its input.

pub mod validate;

pub use validate::{
    FieldErrors, SchemaValidationError, SchemaValidator, Violation, ROOT_FIELD,
};
