// SPDX-License-Identifier: BUSL-1.1
//! # inventa-core: Foundational Types for Inventa
//!
//! The leaf of the workspace DAG. Defines the typed vocabulary every other
//! crate speaks: record identifiers, the single resource taxonomy, the
//! entity records, and the payload shapes used to create and update them.
//!
//! ## Key Design Principles
//!
//! 1. **One `ResourceKind` enum.** Sixteen variants, exhaustive `match`
//!    everywhere. The REST path segment for a resource is derived from it
//!    and from nowhere else.
//!
//! 2. **Three shapes per entity.** Each entity has a record type (with
//!    `id`), a `Draft` (everything needed to construct it, no `id`), and a
//!    `Patch` (every field optional). The [`Resource`] trait ties them
//!    together.
//!
//! 3. **The identifier is never taken from a patch.** Update payloads go
//!    through [`merge_identifier`], which always writes the explicit id.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `inventa-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod model;
pub mod resource;

pub use error::CoreError;
pub use identity::RecordId;
pub use model::{
    Alert, AlertPatch, Area, AreaPatch, Center, CenterPatch, Feature, FeaturePatch,
    InventoryItem, InventoryPatch, ItemCategory, ItemCategoryPatch, Material, MaterialPatch,
    Module, ModulePatch, Movement, MovementKind, MovementPatch, Municipality, MunicipalityPatch,
    NewAlert, NewArea, NewCenter, NewFeature, NewInventoryItem, NewItemCategory, NewMaterial,
    NewModule, NewMovement, NewMunicipality, NewPermission, NewProgram, NewRole, NewSite,
    NewSiteType, NewUser, Permission, PermissionPatch, Program, ProgramPatch, Role, RolePatch,
    Site, SitePatch, SiteType, SiteTypePatch, User, UserPatch,
};
pub use resource::{merge_identifier, Resource, ResourceKind, ID_FIELD, RESOURCE_KIND_COUNT};
