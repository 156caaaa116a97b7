// SPDX-License-Identifier: BUSL-1.1
//! In-memory storage backend using DashMap.
//!
//! Each resource kind gets its own `DashMap<RecordId, serde_json::Value>`.
//! Identifiers come from one sequence shared by every table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use inventa_core::{RecordId, ResourceKind};
use inventa_schema::{SchemaValidationError, SchemaValidator};
use serde_json::Value;

struct Inner {
    tables: HashMap<ResourceKind, DashMap<RecordId, Value>>,
    next_id: AtomicI64,
    schema: SchemaValidator,
}

/// Shared application state holding all in-memory tables.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// Empty tables for every resource kind.
    pub fn new() -> Result<Self, SchemaValidationError> {
        let tables = ResourceKind::all()
            .iter()
            .map(|kind| (*kind, DashMap::new()))
            .collect();
        Ok(Self {
            inner: Arc::new(Inner {
                tables,
                next_id: AtomicI64::new(1),
                schema: SchemaValidator::new()?,
            }),
        })
    }

    /// The table for `kind`.
    pub fn table(&self, kind: ResourceKind) -> Option<&DashMap<RecordId, Value>> {
        self.inner.tables.get(&kind)
    }

    /// Allocate the next identifier.
    pub fn next_id(&self) -> RecordId {
        RecordId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn schema(&self) -> &SchemaValidator {
        &self.inner.schema
    }

    /// Rows of `kind`, sorted by id.
    pub fn sorted_rows(&self, kind: ResourceKind) -> Vec<Value> {
        let Some(table) = self.table(kind) else {
            return Vec::new();
        };
        let mut rows: Vec<(RecordId, Value)> = table
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        rows.sort_by_key(|(id, _)| *id);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}
