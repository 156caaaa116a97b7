// SPDX-License-Identifier: BUSL-1.1
//! Material catalogue: materials, item categories, and characteristics.

use crate::identity::RecordId;

resource! {
    /// A catalogued material.
    Material => Material, NewMaterial, MaterialPatch {
        nombre: String,
        categoria_id: RecordId,
        /// Unit of measure (e.g. "unidad", "kg").
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unidad: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

resource! {
    ItemCategory => ItemCategory, NewItemCategory, ItemCategoryPatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

resource! {
    /// A characteristic (feature) that items of a category can carry.
    Feature => Feature, NewFeature, FeaturePatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        categoria_id: Option<RecordId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valor: Option<String>,
    }
}
