// SPDX-License-Identifier: BUSL-1.1
//! Alerts raised against inventory (low stock, missing plate, ...).

use chrono::{DateTime, Utc};

use crate::identity::RecordId;

resource! {
    Alert => Alert, NewAlert, AlertPatch {
        mensaje: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inventario_id: Option<RecordId>,
        /// Whether a user has acknowledged the alert.
        #[serde(default)]
        leida: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fecha: Option<DateTime<Utc>>,
    }
}
