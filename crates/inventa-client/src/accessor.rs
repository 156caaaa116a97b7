// SPDX-License-Identifier: BUSL-1.1
//! # Resource Accessors
//!
//! One accessor per operation shape, generic over the resource:
//!
//! | Accessor | Returns |
//! |----------|---------|
//! | [`CollectionAccessor`] | `Collection { items, loading }` |
//! | [`RecordAccessor`] | `Record { record, loading }` |
//! | [`CreateAccessor`] | created record, or the transport error |
//! | [`UpdateAccessor`] | updated record, or the transport error |
//! | [`DeleteAccessor`] | `()`, or the transport error |
//!
//! ## Normalization Rule
//!
//! Read accessors never return "no value" for a collection: absent data is
//! an empty `items`, and so is data that is not a JSON array. Elements that
//! do not decode as the resource are dropped. A single record that is absent,
//! `null`, or undecodable is `None`. "No data yet" and "empty collection" are
//! deliberately indistinguishable; the stored error, where a caller needs it,
//! is available from [`CollectionAccessor::snapshot_with_error`].
//!
//! ## Mutations
//!
//! Each mutation dispatches exactly once. Once the transport accepts it the
//! resource's queries are invalidated, even if the reply then fails to
//! decode. On failure the transport error is returned unchanged.
//! Concurrent calls are not queued or serialized.

use std::marker::PhantomData;
use std::sync::Arc;

use inventa_core::{
    InventoryItem, InventoryPatch, RecordId, Resource, ResourceKind, ID_FIELD,
};
use inventa_schema::SchemaValidator;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{decode, ResourceApi, Resources};
use crate::error::ApiError;
use crate::query::{QueryClient, QueryKey};

// -- Normalized read shapes ---------------------------------------------------

/// Normalized collection read.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    pub items: Vec<R>,
    pub loading: bool,
}

impl<R> Collection<R> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }
}

/// Collection read that also exposes the raw stored error.
#[derive(Debug, Clone)]
pub struct CollectionWithError<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<Arc<ApiError>>,
}

/// Normalized single-record read.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<R> {
    pub record: Option<R>,
    pub loading: bool,
}

/// Apply the collection normalization rule to a stored payload.
pub fn normalize_collection<R: DeserializeOwned>(kind: ResourceKind, data: Option<&Value>) -> Vec<R> {
    let elements = match data {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            tracing::warn!(
                resource = %kind,
                got = json_type_name(other),
                "collection payload is not an array; treating as empty"
            );
            return Vec::new();
        }
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match R::deserialize(element) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(resource = %kind, index, error = %e, "dropping undecodable element");
                None
            }
        })
        .collect()
}

/// Apply the single-record normalization rule to a stored payload.
pub fn normalize_record<R: DeserializeOwned>(kind: ResourceKind, data: Option<&Value>) -> Option<R> {
    match data {
        None | Some(Value::Null) => None,
        Some(value) => match R::deserialize(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(resource = %kind, error = %e, "record payload does not decode; treating as absent");
                None
            }
        },
    }
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

// -- Read accessors -----------------------------------------------------------

/// Reads the whole collection of `R`.
pub struct CollectionAccessor<R> {
    query: Arc<QueryClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CollectionAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> CollectionAccessor<R> {
    pub(crate) fn new(query: Arc<QueryClient>) -> Self {
        Self {
            query,
            _resource: PhantomData,
        }
    }

    fn key() -> QueryKey {
        QueryKey::List(R::KIND)
    }

    /// Current normalized view, without fetching.
    pub fn snapshot(&self) -> Collection<R> {
        let state = self.query.state(&Self::key());
        Collection {
            items: normalize_collection(R::KIND, state.data.as_ref()),
            loading: state.is_fetching(),
        }
    }

    /// Current normalized view plus the last fetch error.
    pub fn snapshot_with_error(&self) -> CollectionWithError<R> {
        let state = self.query.state(&Self::key());
        CollectionWithError {
            items: normalize_collection(R::KIND, state.data.as_ref()),
            loading: state.is_fetching(),
            error: state.error,
        }
    }

    /// Fetch if nothing is stored or the stored data is stale, then snapshot.
    ///
    /// A failed fetch is recorded in the store, not returned.
    pub async fn load(&self) -> Collection<R> {
        if self.query.state(&Self::key()).needs_fetch() {
            let _ = self.query.fetch(Self::key()).await;
        }
        self.snapshot()
    }

    /// Always fetch, then snapshot.
    pub async fn refresh(&self) -> Collection<R> {
        let _ = self.query.fetch(Self::key()).await;
        self.snapshot()
    }
}

/// Reads single records of `R` by identifier.
pub struct RecordAccessor<R> {
    query: Arc<QueryClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> RecordAccessor<R> {
    pub(crate) fn new(query: Arc<QueryClient>) -> Self {
        Self {
            query,
            _resource: PhantomData,
        }
    }

    /// Current normalized view of record `id`, without fetching.
    pub fn snapshot(&self, id: RecordId) -> Record<R> {
        let state = self.query.state(&QueryKey::Detail(R::KIND, id));
        Record {
            record: normalize_record(R::KIND, state.data.as_ref()),
            loading: state.is_fetching(),
        }
    }

    /// Fetch record `id` if needed, then snapshot.
    pub async fn load(&self, id: RecordId) -> Record<R> {
        let key = QueryKey::Detail(R::KIND, id);
        if self.query.state(&key).needs_fetch() {
            let _ = self.query.fetch(key).await;
        }
        self.snapshot(id)
    }

    /// Always fetch record `id`, then snapshot.
    pub async fn refresh(&self, id: RecordId) -> Record<R> {
        let _ = self.query.fetch(QueryKey::Detail(R::KIND, id)).await;
        self.snapshot(id)
    }
}

// -- Mutation accessors -------------------------------------------------------

/// Creates records of `R`.
pub struct CreateAccessor<R> {
    api: Resources<R>,
    query: Arc<QueryClient>,
    schema: Arc<SchemaValidator>,
}

impl<R> Clone for CreateAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            query: Arc::clone(&self.query),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<R: Resource> CreateAccessor<R> {
    pub(crate) fn new(query: Arc<QueryClient>, schema: Arc<SchemaValidator>) -> Self {
        Self {
            api: Resources::new(Arc::clone(query.transport())),
            query,
            schema,
        }
    }

    /// Create a record. Invalidates `R`'s queries once the backend accepts
    /// it, even if the response body then fails to decode.
    pub async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let value = self.api.dispatch_create(draft).await?;
        self.query.invalidate(R::KIND);
        let created: R = decode(value, format!("POST /api/{}", R::KIND))?;
        tracing::debug!(resource = %R::KIND, id = %created.id(), "record created");
        Ok(created)
    }
}

impl CreateAccessor<InventoryItem> {
    /// Validate an untyped form payload against the Inventory schema, then
    /// create it. Schema violations are returned as
    /// [`ApiError::Validation`] and nothing is dispatched.
    pub async fn create_from_form(&self, form: &Value) -> Result<InventoryItem, ApiError> {
        let draft = self.schema.validate_inventory(form)?;
        self.create(&draft).await
    }
}

/// Updates records of `R`.
pub struct UpdateAccessor<R> {
    api: Resources<R>,
    query: Arc<QueryClient>,
    schema: Arc<SchemaValidator>,
}

impl<R> Clone for UpdateAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            query: Arc::clone(&self.query),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl<R: Resource> UpdateAccessor<R> {
    pub(crate) fn new(query: Arc<QueryClient>, schema: Arc<SchemaValidator>) -> Self {
        Self {
            api: Resources::new(Arc::clone(query.transport())),
            query,
            schema,
        }
    }

    /// Update record `id`. Any `id` inside `patch` is replaced by `id`.
    /// Invalidates `R`'s queries once the backend accepts the update, even
    /// if the response body then fails to decode.
    pub async fn update(&self, id: RecordId, patch: &R::Patch) -> Result<R, ApiError> {
        let value = self.api.dispatch_update(id, patch).await?;
        self.query.invalidate(R::KIND);
        let updated: R = decode(value, format!("PUT /api/{}/{id}", R::KIND))?;
        tracing::debug!(resource = %R::KIND, %id, "record updated");
        Ok(updated)
    }
}

impl UpdateAccessor<InventoryItem> {
    /// Validate a full untyped form payload against the Inventory schema,
    /// then update record `id` with every field it carries. Optional fields
    /// missing from the form are cleared.
    pub async fn update_from_form(
        &self,
        id: RecordId,
        form: &Value,
    ) -> Result<InventoryItem, ApiError> {
        let draft = self.schema.validate_inventory(form)?;
        let patch = InventoryPatch {
            id: form.get(ID_FIELD).and_then(Value::as_i64).map(RecordId),
            stock: Some(draft.stock),
            sitio_id: Some(draft.sitio_id),
            material_id: Some(draft.material_id),
            placa: Some(draft.placa),
            descripcion: Some(draft.descripcion),
        };
        self.update(id, &patch).await
    }
}

/// Deletes records of `R`.
pub struct DeleteAccessor<R> {
    api: Resources<R>,
    query: Arc<QueryClient>,
}

impl<R> Clone for DeleteAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            query: Arc::clone(&self.query),
        }
    }
}

impl<R: Resource> DeleteAccessor<R> {
    pub(crate) fn new(query: Arc<QueryClient>) -> Self {
        Self {
            api: Resources::new(Arc::clone(query.transport())),
            query,
        }
    }

    /// Delete record `id`. Invalidates `R`'s queries on success.
    pub async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        self.api.remove(id).await?;
        tracing::debug!(resource = %R::KIND, %id, "record deleted");
        self.query.invalidate(R::KIND);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventa_core::Area;
    use serde_json::json;

    #[test]
    fn absent_collection_is_empty() {
        let items: Vec<Area> = normalize_collection(ResourceKind::Area, None);
        assert!(items.is_empty());
        let items: Vec<Area> = normalize_collection(ResourceKind::Area, Some(&Value::Null));
        assert!(items.is_empty());
    }

    #[test]
    fn non_array_collection_is_empty() {
        let payload = json!({ "data": [{ "id": 1, "nombre": "A" }] });
        let items: Vec<Area> = normalize_collection(ResourceKind::Area, Some(&payload));
        assert!(items.is_empty());
        let items: Vec<Area> = normalize_collection(ResourceKind::Area, Some(&json!("oops")));
        assert!(items.is_empty());
    }

    #[test]
    fn undecodable_elements_are_dropped() {
        let payload = json!([
            { "id": 1, "nombre": "Compras" },
            { "nombre": "sin id" },
            42,
            { "id": 3, "nombre": "Sistemas", "descripcion": "TI" }
        ]);
        let items: Vec<Area> = normalize_collection(ResourceKind::Area, Some(&payload));
        let ids: Vec<i64> = items.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn absent_or_null_record_is_none() {
        assert!(normalize_record::<Area>(ResourceKind::Area, None).is_none());
        assert!(normalize_record::<Area>(ResourceKind::Area, Some(&Value::Null)).is_none());
        assert!(normalize_record::<Area>(ResourceKind::Area, Some(&json!([1]))).is_none());
    }

    #[test]
    fn record_decodes() {
        let area =
            normalize_record::<Area>(ResourceKind::Area, Some(&json!({ "id": 2, "nombre": "B" })))
                .unwrap();
        assert_eq!(area.nombre, "B");
    }
}
