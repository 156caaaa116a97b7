// SPDX-License-Identifier: BUSL-1.1
//! # Resource Taxonomy: Single Source of Truth
//!
//! Defines the `ResourceKind` enum naming every collection the backend
//! exposes, and the [`Resource`] trait that binds an entity record to its
//! kind and payload shapes.
//!
//! Every `match` on `ResourceKind` is exhaustive, so adding a resource
//! forces every route table, path builder, and schema lookup to handle it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identity::RecordId;

/// Name of the identifier field in every record and update payload.
pub const ID_FIELD: &str = "id";

/// All resource collections managed by the application.
///
/// | # | Kind | Path segment |
/// |---|------|--------------|
/// |  1 | Area | `areas` |
/// |  2 | Site | `sitios` |
/// |  3 | SiteType | `tipos-sitio` |
/// |  4 | Municipality | `municipios` |
/// |  5 | Center | `centros` |
/// |  6 | Material | `materiales` |
/// |  7 | ItemCategory | `categorias` |
/// |  8 | Feature | `caracteristicas` |
/// |  9 | Inventory | `inventario` |
/// | 10 | Movement | `movimientos` |
/// | 11 | Module | `modulos` |
/// | 12 | Permission | `permisos` |
/// | 13 | Program | `programas` |
/// | 14 | Role | `roles` |
/// | 15 | User | `usuarios` |
/// | 16 | Alert | `alertas` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Organisational areas.
    #[serde(rename = "areas")]
    Area,
    /// Physical sites holding inventory.
    #[serde(rename = "sitios")]
    Site,
    /// Classification of sites.
    #[serde(rename = "tipos-sitio")]
    SiteType,
    /// Municipalities.
    #[serde(rename = "municipios")]
    Municipality,
    /// Centers grouping sites within a municipality.
    #[serde(rename = "centros")]
    Center,
    /// Material catalogue.
    #[serde(rename = "materiales")]
    Material,
    /// Categories of materials and characteristics.
    #[serde(rename = "categorias")]
    ItemCategory,
    /// Characteristics attached to categories.
    #[serde(rename = "caracteristicas")]
    Feature,
    /// Stock of one material at one site.
    #[serde(rename = "inventario")]
    Inventory,
    /// Stock movements (in/out) against an inventory item.
    #[serde(rename = "movimientos")]
    Movement,
    /// Application modules that permissions are granted on.
    #[serde(rename = "modulos")]
    Module,
    /// Permissions on modules.
    #[serde(rename = "permisos")]
    Permission,
    /// Programs run by areas.
    #[serde(rename = "programas")]
    Program,
    /// User roles.
    #[serde(rename = "roles")]
    Role,
    /// Application users.
    #[serde(rename = "usuarios")]
    User,
    /// Alerts raised against inventory.
    #[serde(rename = "alertas")]
    Alert,
}

/// Total number of resource kinds.
pub const RESOURCE_KIND_COUNT: usize = 16;

impl ResourceKind {
    /// Returns all resource kinds in canonical order.
    pub fn all() -> &'static [ResourceKind] {
        &[
            Self::Area,
            Self::Site,
            Self::SiteType,
            Self::Municipality,
            Self::Center,
            Self::Material,
            Self::ItemCategory,
            Self::Feature,
            Self::Inventory,
            Self::Movement,
            Self::Module,
            Self::Permission,
            Self::Program,
            Self::Role,
            Self::User,
            Self::Alert,
        ]
    }

    /// Returns the REST path segment for this resource.
    ///
    /// Must match the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "areas",
            Self::Site => "sitios",
            Self::SiteType => "tipos-sitio",
            Self::Municipality => "municipios",
            Self::Center => "centros",
            Self::Material => "materiales",
            Self::ItemCategory => "categorias",
            Self::Feature => "caracteristicas",
            Self::Inventory => "inventario",
            Self::Movement => "movimientos",
            Self::Module => "modulos",
            Self::Permission => "permisos",
            Self::Program => "programas",
            Self::Role => "roles",
            Self::User => "usuarios",
            Self::Alert => "alertas",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    /// Parse a resource kind from its path segment. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}

/// An entity record stored in one resource collection.
///
/// `Draft` carries every field needed to construct the record and no
/// identifier. `Patch` carries any subset of fields, and may carry an
/// identifier that callers must not trust (see [`merge_identifier`]).
pub trait Resource:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// The collection this record lives in.
    const KIND: ResourceKind;

    /// Creation payload.
    type Draft: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Partial-update payload.
    type Patch: Serialize
        + DeserializeOwned
        + Clone
        + Default
        + fmt::Debug
        + Send
        + Sync
        + 'static;

    /// The record's identifier.
    fn id(&self) -> RecordId;
}

/// Build the payload dispatched for an update of record `id`.
///
/// The patch's fields are kept as given, except `id`, which is always set
/// to the explicit argument. A stale `id` inside the patch is overwritten.
///
/// # Errors
///
/// Returns [`CoreError::PayloadShape`] if the patch does not serialize to
/// a JSON object, and [`CoreError::Serialization`] if it cannot be
/// serialized at all.
pub fn merge_identifier<P: Serialize>(id: RecordId, patch: &P) -> Result<Value, CoreError> {
    let mut value = serde_json::to_value(patch)?;
    let Some(object) = value.as_object_mut() else {
        return Err(CoreError::PayloadShape(format!(
            "update payload must be a JSON object, got {}",
            json_type_name(&value)
        )));
    };
    object.insert(ID_FIELD.to_string(), Value::from(id.get()));
    Ok(value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
