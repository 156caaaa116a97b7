// SPDX-License-Identifier: BUSL-1.1
//! # Typed Resource API
//!
//! [`ResourceApi`] is the explicit per-resource interface every consumer
//! calls: `list`, `get_by_id`, `create`, `update`, `remove`. It is
//! implemented once, generically, by [`Resources`] over any [`Transport`].
//!
//! Unlike the read accessors, this layer is strict: a response that does
//! not decode as the resource type is an [`ApiError::Deserialization`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use inventa_core::{merge_identifier, RecordId, Resource};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::Transport;

/// The five operations available on one resource.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// Every record in the collection.
    async fn list(&self) -> Result<Vec<R>, ApiError>;

    /// One record, or `None` if the backend has no record `id`.
    async fn get_by_id(&self, id: RecordId) -> Result<Option<R>, ApiError>;

    /// Create a record from its draft.
    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError>;

    /// Update record `id`. The dispatched `id` is always the argument.
    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<R, ApiError>;

    /// Delete record `id`.
    async fn remove(&self, id: RecordId) -> Result<(), ApiError>;
}

/// Generic [`ResourceApi`] implementation for resource `R`.
pub struct Resources<R> {
    transport: Arc<dyn Transport>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Resources<R> {
    /// Bind resource `R` to a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for Resources<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.transport))
    }
}

impl<R: Resource> std::fmt::Debug for Resources<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources").field("kind", &R::KIND).finish()
    }
}

impl<R: Resource> Resources<R> {
    /// Send a create and return the raw response, undecoded.
    pub(crate) async fn dispatch_create(&self, draft: &R::Draft) -> Result<Value, ApiError> {
        let body = serde_json::to_value(draft).map_err(inventa_core::CoreError::from)?;
        self.transport.create(R::KIND, body).await
    }

    /// Send an update with the identifier merged in and return the raw
    /// response, undecoded.
    pub(crate) async fn dispatch_update(
        &self,
        id: RecordId,
        patch: &R::Patch,
    ) -> Result<Value, ApiError> {
        let body = merge_identifier(id, patch)?;
        self.transport.update(R::KIND, id, body).await
    }
}

/// Strictly decode a response body, naming `endpoint` on failure.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, endpoint: String) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization {
        endpoint,
        reason: e.to_string(),
    })
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for Resources<R> {
    async fn list(&self) -> Result<Vec<R>, ApiError> {
        let value = self.transport.list(R::KIND).await?;
        decode(value, format!("GET /api/{}", R::KIND))
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Option<R>, ApiError> {
        match self.transport.fetch_one(R::KIND, id).await? {
            Some(value) => decode(value, format!("GET /api/{}/{id}", R::KIND)),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let value = self.dispatch_create(draft).await?;
        decode(value, format!("POST /api/{}", R::KIND))
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<R, ApiError> {
        let value = self.dispatch_update(id, patch).await?;
        decode(value, format!("PUT /api/{}/{id}", R::KIND))
    }

    async fn remove(&self, id: RecordId) -> Result<(), ApiError> {
        self.transport.remove(R::KIND, id).await
    }
}
