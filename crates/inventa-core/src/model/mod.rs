// SPDX-License-Identifier: BUSL-1.1
//! # Entity Records
//!
//! Record, `Draft`, and `Patch` types for all sixteen resources. Field names
//! are the backend's wire names.
//!
//! Records use `#[serde(default)]` on optional fields for resilience
//! against schema evolution; unknown fields are ignored rather than
//! rejected.

/// Declare an entity record together with its creation and update payloads
/// and its [`Resource`](crate::resource::Resource) binding.
///
/// The record gets `id` plus the listed fields; the draft gets the listed
/// fields; the patch gets an optional `id` plus every listed field wrapped
/// in `Option`, omitted from the wire when `None`.
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $kind:ident => $name:ident, $draft:ident, $patch:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            pub id: $crate::identity::RecordId,
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        #[doc = concat!("Creation payload for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $draft {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        #[doc = concat!("Partial-update payload for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $patch {
            /// Identifier carried by the caller's payload. Overwritten on dispatch.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub id: Option<$crate::identity::RecordId>,
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $draft {
            /// Attach a server-assigned identifier.
            pub fn into_record(self, id: $crate::identity::RecordId) -> $name {
                $name {
                    id,
                    $( $field: self.$field, )*
                }
            }
        }

        impl $crate::resource::Resource for $name {
            const KIND: $crate::resource::ResourceKind = $crate::resource::ResourceKind::$kind;
            type Draft = $draft;
            type Patch = $patch;

            fn id(&self) -> $crate::identity::RecordId {
                self.id
            }
        }
    };
}

mod access;
mod alert;
mod catalog;
mod inventory;
mod location;

pub use access::{
    Module, ModulePatch, NewModule, NewPermission, NewProgram, NewRole, NewUser, Permission,
    PermissionPatch, Program, ProgramPatch, Role, RolePatch, User, UserPatch,
};
pub use alert::{Alert, AlertPatch, NewAlert};
pub use catalog::{
    Feature, FeaturePatch, ItemCategory, ItemCategoryPatch, Material, MaterialPatch, NewFeature,
    NewItemCategory, NewMaterial,
};
pub use inventory::{
    InventoryItem, InventoryPatch, Movement, MovementKind, MovementPatch, NewInventoryItem,
    NewMovement,
};
pub use location::{
    Area, AreaPatch, Center, CenterPatch, Municipality, MunicipalityPatch, NewArea, NewCenter,
    NewMunicipality, NewSite, NewSiteType, Site, SitePatch, SiteType, SiteTypePatch,
};

pub(crate) fn default_true() -> bool {
    true
}
