// SPDX-License-Identifier: BUSL-1.1
//! # Schema Validation
//!
//! Validation of JSON payloads against the embedded Draft 2020-12 schemas.
//!
//! ## Field attribution
//!
//! Each `jsonschema` error becomes a [`Violation`] attributed to one field:
//!
//! - `required` errors name the missing property, so they are attributed
//!   to that property rather than to the document root.
//! - Every other error is attributed to the first segment of its instance
//!   path (`/stock` → `stock`).
//! - Errors at the document root (e.g. "not an object") go to [`ROOT_FIELD`].
//!
//! JSON Schema's `integer` admits `5.0` and `1e30`, neither of which decodes
//! as `i64`. Top-level `integer` properties are therefore also checked for
//! an exact `i64` value, and failures are attributed to that property.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use inventa_core::{NewInventoryItem, ResourceKind};
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Field name used for violations that concern the whole document.
pub const ROOT_FIELD: &str = "";

/// Embedded schemas, keyed by the resource they describe.
const EMBEDDED_SCHEMAS: &[(ResourceKind, &str, &str)] = &[(
    ResourceKind::Inventory,
    "inventario.schema.json",
    include_str!("../schemas/inventario.schema.json"),
)];

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{fields}")]
    ValidationFailed {
        /// Name of the schema that was validated against.
        schema_name: String,
        /// Offending fields and their messages.
        fields: FieldErrors,
    },

    /// No schema is published for the requested resource.
    #[error("no schema registered for resource '{0}'")]
    SchemaNotFound(ResourceKind),

    /// An embedded schema is not valid JSON.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema filename.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// An embedded schema could not be compiled.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild {
        /// Schema filename.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

impl SchemaValidationError {
    /// The field-level errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationFailed { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the violation is attributed to ([`ROOT_FIELD`] for the document).
    pub field: String,
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.field, self.message)
        }
    }
}

/// Field-level validation errors.
///
/// Serializes as `{ "<field>": ["<message>", ...] }`, the shape forms
/// consume directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    violations: Vec<Violation>,
}

impl FieldErrors {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation is attributed to `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Messages attributed to `field`, in validation order.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.message.as_str())
            .collect()
    }

    /// Offending field names, sorted and deduplicated.
    pub fn fields(&self) -> Vec<&str> {
        self.by_field().into_keys().collect()
    }

    /// Group messages by field.
    pub fn by_field(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut map: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for v in &self.violations {
            map.entry(v.field.as_str()).or_default().push(v.message.as_str());
        }
        map
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.by_field().serialize(serializer)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

struct CompiledSchema {
    name: &'static str,
    validator: Validator,
    /// Top-level properties declared `"type": "integer"`.
    integer_fields: Vec<String>,
}

/// Names of the top-level properties whose type is exactly `integer`.
fn integer_properties(schema: &Value) -> Vec<String> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .filter(|(_, prop)| prop.get("type").and_then(Value::as_str) == Some("integer"))
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Violations for integer properties whose value is not an exact `i64`.
fn i64_violations(integer_fields: &[String], instance: &Value) -> Vec<Violation> {
    integer_fields
        .iter()
        .filter_map(|field| {
            let value = instance.get(field)?;
            if !value.is_number() || value.as_i64().is_some() {
                return None;
            }
            Some(Violation {
                field: field.clone(),
                instance_path: format!("/{field}"),
                schema_path: format!("/properties/{field}/type"),
                message: format!("{value} is not a 64-bit signed integer"),
            })
        })
        .collect()
}

/// Compiled validators for every embedded schema.
///
/// `SchemaValidator` is `Send + Sync`; build it once and share it.
pub struct SchemaValidator {
    schemas: HashMap<ResourceKind, CompiledSchema>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.schemas.values().map(|s| s.name).collect();
        names.sort_unstable();
        f.debug_struct("SchemaValidator")
            .field("schemas", &names)
            .finish()
    }
}

impl SchemaValidator {
    /// Compile every embedded schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoad`] if an embedded schema is
    /// not valid JSON, or [`SchemaValidationError::ValidatorBuild`] if it
    /// does not compile.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);

        let mut schemas = HashMap::new();
        for (kind, name, source) in EMBEDDED_SCHEMAS {
            let value: Value =
                serde_json::from_str(source).map_err(|e| SchemaValidationError::SchemaLoad {
                    schema_name: (*name).to_string(),
                    reason: format!("invalid JSON: {e}"),
                })?;
            let validator =
                opts.build(&value)
                    .map_err(|e| SchemaValidationError::ValidatorBuild {
                        schema_name: (*name).to_string(),
                        reason: e.to_string(),
                    })?;
            schemas.insert(
                *kind,
                CompiledSchema {
                    name,
                    validator,
                    integer_fields: integer_properties(&value),
                },
            );
        }

        Ok(Self { schemas })
    }

    /// Whether a schema is published for `kind`.
    pub fn has_schema(&self, kind: ResourceKind) -> bool {
        self.schemas.contains_key(&kind)
    }

    /// Validate `instance` against the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaNotFound`] if `kind` has no
    /// schema, and [`SchemaValidationError::ValidationFailed`] with every
    /// violation if the document is invalid.
    pub fn validate_document(
        &self,
        kind: ResourceKind,
        instance: &Value,
    ) -> Result<(), SchemaValidationError> {
        let schema = self
            .schemas
            .get(&kind)
            .ok_or(SchemaValidationError::SchemaNotFound(kind))?;

        let mut violations: Vec<Violation> = schema
            .validator
            .iter_errors(instance)
            .map(|e| {
                let instance_path = e.instance_path.to_string();
                let field = match &e.kind {
                    ValidationErrorKind::Required { property } => property
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| property.to_string()),
                    _ => first_segment(&instance_path),
                };
                Violation {
                    field,
                    instance_path,
                    schema_path: e.schema_path.to_string(),
                    message: e.to_string(),
                }
            })
            .collect();
        for extra in i64_violations(&schema.integer_fields, instance) {
            if !violations.iter().any(|v| v.field == extra.field) {
                violations.push(extra);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: schema.name.to_string(),
                fields: FieldErrors { violations },
            })
        }
    }

    /// Validate an Inventory payload and decode it into a typed draft.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidationFailed`] if the payload
    /// violates the schema, or if it passes the schema but still cannot be
    /// represented by [`NewInventoryItem`] (e.g. an integer out of range).
    pub fn validate_inventory(
        &self,
        instance: &Value,
    ) -> Result<NewInventoryItem, SchemaValidationError> {
        self.validate_document(ResourceKind::Inventory, instance)?;
        serde_json::from_value(instance.clone()).map_err(|e| {
            SchemaValidationError::ValidationFailed {
                schema_name: "inventario.schema.json".to_string(),
                fields: FieldErrors {
                    violations: vec![Violation {
                        field: ROOT_FIELD.to_string(),
                        instance_path: String::new(),
                        schema_path: String::new(),
                        message: e.to_string(),
                    }],
                },
            }
        })
    }
}

/// `/stock/0` → `stock`; `` → ``.
fn first_segment(pointer: &str) -> String {
    pointer
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .replace("~1", "/")
        .replace("~0", "~")
}
