// SPDX-License-Identifier: BUSL-1.1
//! Inventory items and the stock movements recorded against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::RecordId;

resource! {
    /// Stock of one material held at one site.
    ///
    /// The accepted creation/update shape is also published as a JSON
    /// Schema by `inventa-schema`; keep the two in step.
    Inventory => InventoryItem, NewInventoryItem, InventoryPatch {
        stock: i64,
        sitio_id: RecordId,
        material_id: RecordId,
        /// Asset plate tag.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placa: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock received.
    Entrada,
    /// Stock issued.
    Salida,
    /// Forward-compatible catch-all for movement types added by the
    /// backend after this client version is deployed.
    #[serde(other)]
    Unknown,
}

resource! {
    Movement => Movement, NewMovement, MovementPatch {
        tipo: MovementKind,
        cantidad: i64,
        inventario_id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usuario_id: Option<RecordId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fecha: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}
