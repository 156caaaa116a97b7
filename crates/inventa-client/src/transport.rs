// SPDX-License-Identifier: BUSL-1.1
//! # Transport: Raw Request Primitives
//!
//! [`Transport`] is the seam between the accessor layer and the network.
//! It speaks untyped JSON so that the query store can hold whatever the
//! backend actually returned; typing and normalization happen above it.
//!
//! ## REST Path Convention
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/{resource}` | list |
//! | GET    | `/api/{resource}/{id}` | fetch one (404 ⇒ `None`) |
//! | POST   | `/api/{resource}` | create |
//! | PUT    | `/api/{resource}/{id}` | update |
//! | DELETE | `/api/{resource}/{id}` | remove |
//!
//! Each call performs exactly one request. There is no retry: a failed
//! request is returned to the caller as-is.

use std::time::Duration;

use async_trait::async_trait;
use inventa_core::{RecordId, ResourceKind};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::SessionContext;

/// Raw request/mutation primitives for every resource.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` by every accessor of a client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the whole collection. The value is returned as received.
    async fn list(&self, kind: ResourceKind) -> Result<Value, ApiError>;

    /// Fetch one record. `Ok(None)` when the backend has no such record.
    async fn fetch_one(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Value>, ApiError>;

    /// Create a record and return the stored representation.
    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError>;

    /// Update record `id` with `body` and return the stored representation.
    async fn update(&self, kind: ResourceKind, id: RecordId, body: Value)
        -> Result<Value, ApiError>;

    /// Delete record `id`.
    async fn remove(&self, kind: ResourceKind, id: RecordId) -> Result<(), ApiError>;
}

/// [`Transport`] over HTTP/JSON using `reqwest`.
///
/// The session's bearer token, when present, is attached to every request
/// at send time, so signing in or out takes effect on the next call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl HttpTransport {
    /// Build an HTTP transport from configuration.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Client(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/api/{}", self.base_url, kind.as_str())
    }

    fn record_url(&self, kind: ResourceKind, id: RecordId) -> String {
        format!("{}/api/{}/{}", self.base_url, kind.as_str(), id)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        };
        tracing::debug!(endpoint, "dispatching request");
        request.send().await.map_err(|e| ApiError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

/// Reject non-2xx responses with their body, then decode the body as JSON.
/// An empty body decodes to `null`.
async fn read_json(resp: reqwest::Response, endpoint: &str) -> Result<Value, ApiError> {
    let resp = ensure_success(resp, endpoint).await?;
    let bytes = resp.bytes().await.map_err(|e| ApiError::Http {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Deserialization {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

async fn ensure_success(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(endpoint, status, "backend rejected request");
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list(&self, kind: ResourceKind) -> Result<Value, ApiError> {
        let endpoint = format!("GET /api/{kind}");
        let resp = self
            .send(self.http.get(self.collection_url(kind)), &endpoint)
            .await?;
        read_json(resp, &endpoint).await
    }

    async fn fetch_one(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Value>, ApiError> {
        let endpoint = format!("GET /api/{kind}/{id}");
        let resp = self
            .send(self.http.get(self.record_url(kind, id)), &endpoint)
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(resp, &endpoint).await.map(Some)
    }

    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        let endpoint = format!("POST /api/{kind}");
        let resp = self
            .send(self.http.post(self.collection_url(kind)).json(&body), &endpoint)
            .await?;
        read_json(resp, &endpoint).await
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: RecordId,
        body: Value,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("PUT /api/{kind}/{id}");
        let resp = self
            .send(self.http.put(self.record_url(kind, id)).json(&body), &endpoint)
            .await?;
        read_json(resp, &endpoint).await
    }

    async fn remove(&self, kind: ResourceKind, id: RecordId) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /api/{kind}/{id}");
        let resp = self
            .send(self.http.delete(self.record_url(kind, id)), &endpoint)
            .await?;
        ensure_success(resp, &endpoint).await.map(|_| ())
    }
}
