// SPDX-License-Identifier: BUSL-1.1
//! # Query Store
//!
//! The shared response store every accessor reads through. One entry per
//! [`QueryKey`]; each entry records the last raw payload, how many fetches
//! are in flight, the last error, and whether a mutation has made the
//! payload stale.
//!
//! Accessors never touch entries directly; they go through
//! [`QueryClient::state`], [`QueryClient::fetch`] and
//! [`QueryClient::invalidate`]. Map guards are never held across an
//! `.await`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use inventa_core::{RecordId, ResourceKind};
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::Transport;

/// Identity of one cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The whole collection of a resource.
    List(ResourceKind),
    /// One record of a resource.
    Detail(ResourceKind, RecordId),
}

impl QueryKey {
    /// The resource this query reads.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::List(kind) | Self::Detail(kind, _) => *kind,
        }
    }
}

/// Snapshot of one cached query.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Last payload received, exactly as the transport returned it.
    /// `Some(Value::Null)` records a completed lookup that found nothing.
    pub data: Option<Value>,
    /// Number of fetches currently in flight.
    pub in_flight: u32,
    /// Error from the most recent failed fetch, cleared by the next success.
    pub error: Option<Arc<ApiError>>,
    /// Set by [`QueryClient::invalidate`]; cleared by the next successful fetch.
    pub stale: bool,
    /// When `data` was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueryState {
    /// Whether a fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether a read accessor should fetch before answering.
    pub fn needs_fetch(&self) -> bool {
        self.data.is_none() || self.stale
    }
}

/// Holds one unit of `in_flight` for a key; released on drop, so a fetch
/// future cancelled mid-request does not leave the key loading.
struct InFlight<'a> {
    cache: &'a DashMap<QueryKey, QueryState>,
    key: QueryKey,
}

impl<'a> InFlight<'a> {
    fn enter(cache: &'a DashMap<QueryKey, QueryState>, key: QueryKey) -> Self {
        cache.entry(key).or_default().in_flight += 1;
        Self { cache, key }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Absent after `clear()`; nothing to release then.
        if let Some(mut entry) = self.cache.get_mut(&self.key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }
}

/// Transport plus the shared store of query results.
pub struct QueryClient {
    transport: Arc<dyn Transport>,
    cache: DashMap<QueryKey, QueryState>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.cache.len())
            .finish()
    }
}

impl QueryClient {
    /// Create an empty store over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: DashMap::new(),
        }
    }

    /// The transport this store fetches through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Snapshot of `key`; the default (empty, idle) state if never fetched.
    pub fn state(&self, key: &QueryKey) -> QueryState {
        self.cache
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Dispatch one fetch for `key` and record its outcome.
    ///
    /// The entry counts as in flight from before dispatch until the outcome
    /// is recorded, or until this future is dropped. On failure the previous
    /// `data` is kept and the error is stored and returned.
    pub async fn fetch(&self, key: QueryKey) -> Result<(), Arc<ApiError>> {
        let in_flight = InFlight::enter(&self.cache, key);

        let result = match key {
            QueryKey::List(kind) => self.transport.list(kind).await,
            QueryKey::Detail(kind, id) => self
                .transport
                .fetch_one(kind, id)
                .await
                .map(|found| found.unwrap_or(Value::Null)),
        };

        let outcome = {
            let mut entry = self.cache.entry(key).or_default();
            match result {
                Ok(value) => {
                    entry.data = Some(value);
                    entry.error = None;
                    entry.stale = false;
                    entry.updated_at = Some(Utc::now());
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!(?key, error = %e, "query fetch failed");
                    let e = Arc::new(e);
                    entry.error = Some(Arc::clone(&e));
                    Err(e)
                }
            }
        };
        drop(in_flight);
        outcome
    }

    /// Mark every query of `kind` stale so readers refetch.
    pub fn invalidate(&self, kind: ResourceKind) {
        let mut marked = 0usize;
        for mut entry in self.cache.iter_mut() {
            if entry.key().kind() == kind {
                entry.value_mut().stale = true;
                marked += 1;
            }
        }
        tracing::debug!(resource = %kind, marked, "invalidated queries");
    }

    /// Overwrite the payload stored for `key`.
    pub fn set_data(&self, key: QueryKey, value: Value) {
        let mut entry = self.cache.entry(key).or_default();
        entry.data = Some(value);
        entry.stale = false;
        entry.updated_at = Some(Utc::now());
    }

    /// Drop every stored query.
    pub fn clear(&self) {
        self.cache.clear();
    }
}
