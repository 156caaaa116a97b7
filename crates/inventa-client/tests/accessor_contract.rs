//! Contract tests for the accessor layer against a scripted in-memory
//! transport.
//!
//! ## Properties Tested
//!
//! | Property | Test |
//! |----------|------|
//! | no data ⇒ `items == []` | `collection_*` |
//! | no data ⇒ `record == None` | `record_*` |
//! | dispatched `id` is the explicit argument | `update_dispatches_explicit_id_*` |
//! | rejected mutation ⇒ original error | `*_failure_preserves_error` |
//! | `loading` mirrors the in-flight fetch | `loading_mirrors_in_flight_fetch` |
//! | mutations invalidate the resource | `create_invalidates_*` |
//! | accepted mutation invalidates even if the reply is undecodable | `undecodable_*_still_invalidates` |
//! | a dropped fetch does not stay loading | `dropped_fetch_releases_loading` |

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inventa_client::{ApiError, InventaClient, SessionContext, Transport};
use inventa_core::{
    Area, AreaPatch, InventoryItem, InventoryPatch, NewArea, NewInventoryItem, RecordId,
    ResourceKind, User,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;

/// One dispatched mutation: operation, resource, target id, body.
#[derive(Debug, Clone)]
struct Dispatch {
    op: &'static str,
    kind: ResourceKind,
    id: Option<RecordId>,
    body: Option<Value>,
}

/// In-memory transport with scripting hooks.
#[derive(Default)]
struct ScriptedTransport {
    tables: Mutex<BTreeMap<(ResourceKind, i64), Value>>,
    next_id: AtomicU32,
    list_override: Mutex<Option<Value>>,
    mutation_response: Mutex<Option<Value>>,
    fail_status: Mutex<Option<(u16, &'static str)>>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    list_calls: AtomicU32,
    dispatched: Mutex<Vec<Dispatch>>,
}

impl ScriptedTransport {
    fn seed(&self, kind: ResourceKind, record: Value) {
        let id = record["id"].as_i64().unwrap();
        self.tables.lock().insert((kind, id), record);
    }

    fn fail_next(&self, status: u16, body: &'static str) {
        *self.fail_status.lock() = Some((status, body));
    }

    fn take_failure(&self, endpoint: String) -> Result<(), ApiError> {
        match self.fail_status.lock().take() {
            Some((status, body)) => Err(ApiError::Status {
                endpoint,
                status,
                body: body.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn record(&self, op: &'static str, kind: ResourceKind, id: Option<RecordId>, body: Option<Value>) {
        self.dispatched.lock().push(Dispatch { op, kind, id, body });
    }

    fn dispatched(&self) -> Vec<Dispatch> {
        self.dispatched.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn list(&self, kind: ResourceKind) -> Result<Value, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.list_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.take_failure(format!("GET /api/{kind}"))?;
        if let Some(value) = self.list_override.lock().clone() {
            return Ok(value);
        }
        let items: Vec<Value> = self
            .tables
            .lock()
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, v)| v.clone())
            .collect();
        Ok(Value::Array(items))
    }

    async fn fetch_one(&self, kind: ResourceKind, id: RecordId) -> Result<Option<Value>, ApiError> {
        self.take_failure(format!("GET /api/{kind}/{id}"))?;
        Ok(self.tables.lock().get(&(kind, id.get())).cloned())
    }

    async fn create(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        self.record("create", kind, None, Some(body.clone()));
        self.take_failure(format!("POST /api/{kind}"))?;
        let wrapped = self.mutation_response.lock().clone();
        let id = i64::from(self.next_id.fetch_add(1, Ordering::SeqCst)) + 100;
        let mut stored = body;
        stored["id"] = json!(id);
        self.tables.lock().insert((kind, id), stored.clone());
        Ok(wrapped.unwrap_or(stored))
    }

    async fn update(&self, kind: ResourceKind, id: RecordId, body: Value) -> Result<Value, ApiError> {
        self.record("update", kind, Some(id), Some(body.clone()));
        self.take_failure(format!("PUT /api/{kind}/{id}"))?;
        let wrapped = self.mutation_response.lock().clone();
        let mut tables = self.tables.lock();
        let stored = tables.entry((kind, id.get())).or_insert_with(|| json!({}));
        for (k, v) in body.as_object().unwrap() {
            stored[k] = v.clone();
        }
        Ok(wrapped.unwrap_or_else(|| stored.clone()))
    }

    async fn remove(&self, kind: ResourceKind, id: RecordId) -> Result<(), ApiError> {
        self.record("remove", kind, Some(id), None);
        self.take_failure(format!("DELETE /api/{kind}/{id}"))?;
        self.tables.lock().remove(&(kind, id.get()));
        Ok(())
    }
}

fn client_over(transport: &Arc<ScriptedTransport>) -> InventaClient {
    InventaClient::with_transport(transport.clone(), SessionContext::new()).unwrap()
}

fn inventory_draft() -> NewInventoryItem {
    NewInventoryItem {
        stock: 5,
        sitio_id: RecordId(1),
        material_id: RecordId(2),
        placa: None,
        descripcion: None,
    }
}

// ── Collection accessor ─────────────────────────────────────────────

#[tokio::test]
async fn collection_before_any_fetch_is_empty_not_loading() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    let areas = client.areas().collection().snapshot();
    assert!(areas.items.is_empty());
    assert!(!areas.loading);
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn collection_load_decodes_records() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(ResourceKind::Area, json!({ "id": 1, "nombre": "Compras" }));
    transport.seed(ResourceKind::Area, json!({ "id": 2, "nombre": "Sistemas" }));
    let client = client_over(&transport);

    let areas = client.areas().collection().load().await;
    assert_eq!(areas.len(), 2);
    assert_eq!(areas.items[1].nombre, "Sistemas");
    assert!(!areas.loading);
}

#[tokio::test]
async fn collection_load_uses_stored_data_until_stale() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    let collection = client.areas().collection();

    collection.load().await;
    collection.load().await;
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 1);

    collection.refresh().await;
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn collection_non_array_payload_is_coerced_to_empty() {
    let transport = Arc::new(ScriptedTransport::default());
    *transport.list_override.lock() = Some(json!({ "results": [{ "id": 1, "nombre": "A" }] }));
    let client = client_over(&transport);

    let areas = client.areas().collection().load().await;
    assert_eq!(areas.items, Vec::<Area>::new());
}

#[tokio::test]
async fn collection_null_payload_is_empty() {
    let transport = Arc::new(ScriptedTransport::default());
    *transport.list_override.lock() = Some(Value::Null);
    let client = client_over(&transport);

    assert!(client.roles().collection().load().await.is_empty());
}

#[tokio::test]
async fn collection_fetch_error_is_only_exposed_by_error_variant() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.fail_next(503, "maintenance");
    let client = client_over(&transport);
    let collection = client.materials().collection();

    let materials = collection.load().await;
    assert!(materials.items.is_empty());
    assert!(!materials.loading);

    let with_error = collection.snapshot_with_error();
    assert!(with_error.items.is_empty());
    let error = with_error.error.expect("stored error");
    assert_eq!(error.status(), Some(503));
    assert!(error.to_string().contains("maintenance"));
}

#[tokio::test]
async fn loading_mirrors_in_flight_fetch() {
    let transport = Arc::new(ScriptedTransport::default());
    let gate = Arc::new(Notify::new());
    *transport.list_gate.lock() = Some(gate.clone());
    let client = client_over(&transport);
    let collection = client.sites().collection();

    let background = collection.clone();
    let task = tokio::spawn(async move { background.refresh().await });

    while !collection.snapshot().loading {
        tokio::task::yield_now().await;
    }
    assert!(collection.snapshot().items.is_empty());

    gate.notify_one();
    let finished = task.await.unwrap();
    assert!(!finished.loading);
    assert!(!collection.snapshot().loading);
}

#[tokio::test]
async fn dropped_fetch_releases_loading() {
    let transport = Arc::new(ScriptedTransport::default());
    *transport.list_gate.lock() = Some(Arc::new(Notify::new()));
    let client = client_over(&transport);
    let collection = client.sites().collection();

    let timed_out = tokio::time::timeout(Duration::from_millis(20), collection.load()).await;
    assert!(timed_out.is_err());
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 1);

    let after = collection.snapshot();
    assert!(!after.loading);
    assert!(after.items.is_empty());
}

// ── Single-record accessor ──────────────────────────────────────────

#[tokio::test]
async fn record_before_fetch_is_none() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    let record = client.inventory().record().snapshot(RecordId(1));
    assert!(record.record.is_none());
    assert!(!record.loading);
}

#[tokio::test]
async fn record_absent_on_backend_is_none() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    let record = client.inventory().record().load(RecordId(404)).await;
    assert!(record.record.is_none());
}

#[tokio::test]
async fn record_present_decodes() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(
        ResourceKind::Inventory,
        json!({ "id": 8, "stock": 12, "sitio_id": 1, "material_id": 3, "placa": "PL-8" }),
    );
    let client = client_over(&transport);

    let item = client.inventory().record().load(RecordId(8)).await.record.unwrap();
    assert_eq!(item.stock, 12);
    assert_eq!(item.placa.as_deref(), Some("PL-8"));
}

// ── Update accessor ─────────────────────────────────────────────────

#[tokio::test]
async fn update_dispatches_explicit_id_over_stale_patch_id() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(ResourceKind::Area, json!({ "id": 4, "nombre": "Viejo" }));
    let client = client_over(&transport);

    let patch = AreaPatch {
        id: Some(RecordId(99)),
        nombre: Some("Nuevo".into()),
        ..Default::default()
    };
    let updated = client.areas().updater().update(RecordId(4), &patch).await.unwrap();
    assert_eq!(updated.id, RecordId(4));
    assert_eq!(updated.nombre, "Nuevo");

    let dispatched = transport.dispatched();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].op, "update");
    assert_eq!(dispatched[0].id, Some(RecordId(4)));
    assert_eq!(dispatched[0].body.as_ref().unwrap()["id"], json!(4));
}

#[tokio::test]
async fn update_dispatches_explicit_id_when_patch_has_none() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(
        ResourceKind::Inventory,
        json!({ "id": 6, "stock": 9, "sitio_id": 1, "material_id": 2 }),
    );
    let client = client_over(&transport);

    let patch = InventoryPatch {
        stock: Some(1),
        ..Default::default()
    };
    client.inventory().updater().update(RecordId(6), &patch).await.unwrap();
    let body = transport.dispatched()[0].body.clone().unwrap();
    assert_eq!(body, json!({ "id": 6, "stock": 1 }));
}

// ── Error preservation ──────────────────────────────────────────────

#[tokio::test]
async fn create_failure_preserves_error() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.fail_next(409, "placa duplicada");
    let client = client_over(&transport);

    let err = client
        .inventory()
        .creator()
        .create(&inventory_draft())
        .await
        .unwrap_err();
    match err {
        ApiError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "POST /api/inventario");
            assert_eq!(status, 409);
            assert_eq!(body, "placa duplicada");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn update_failure_preserves_error() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.fail_next(422, "stock negativo");
    let client = client_over(&transport);

    let err = client
        .inventory()
        .updater()
        .update(RecordId(2), &InventoryPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("stock negativo"));
}

#[tokio::test]
async fn delete_failure_preserves_error() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.fail_next(403, "sin permiso");
    let client = client_over(&transport);

    let err = client.users().deleter().delete(RecordId(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 403, .. }));
}

#[tokio::test]
async fn failed_mutation_does_not_invalidate() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    client.areas().collection().load().await;

    transport.fail_next(500, "boom");
    let draft = NewArea {
        nombre: "X".into(),
        descripcion: None,
    };
    assert!(client.areas().creator().create(&draft).await.is_err());

    let state = client
        .query()
        .state(&inventa_client::QueryKey::List(ResourceKind::Area));
    assert!(!state.stale);
}

#[tokio::test]
async fn undecodable_create_response_still_invalidates() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    client.inventory().collection().load().await;

    *transport.mutation_response.lock() = Some(json!({ "message": "creado", "data": {} }));
    let err = client
        .inventory()
        .creator()
        .create(&inventory_draft())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));

    let state = client
        .query()
        .state(&inventa_client::QueryKey::List(ResourceKind::Inventory));
    assert!(state.stale);
    *transport.mutation_response.lock() = None;
    assert_eq!(client.inventory().collection().load().await.len(), 1);
}

#[tokio::test]
async fn undecodable_update_response_still_invalidates() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(ResourceKind::Area, json!({ "id": 2, "nombre": "Compras" }));
    let client = client_over(&transport);
    client.areas().record().load(RecordId(2)).await;

    *transport.mutation_response.lock() = Some(json!({ "ok": true }));
    let patch = AreaPatch {
        nombre: Some("Ventas".into()),
        ..Default::default()
    };
    let err = client.areas().updater().update(RecordId(2), &patch).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));

    *transport.mutation_response.lock() = None;
    let area = client.areas().record().load(RecordId(2)).await.record.unwrap();
    assert_eq!(area.nombre, "Ventas");
}

// ── Invalidation ────────────────────────────────────────────────────

#[tokio::test]
async fn create_invalidates_collection_and_load_refetches() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    let collection = client.inventory().collection();

    assert!(collection.load().await.is_empty());
    let created = client.inventory().creator().create(&inventory_draft()).await.unwrap();
    assert_eq!(created.stock, 5);

    let after = collection.load().await;
    assert_eq!(after.len(), 1);
    assert_eq!(after.items[0].id, created.id);
    assert_eq!(transport.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn delete_invalidates_detail_queries() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(ResourceKind::Alert, json!({ "id": 3, "mensaje": "Stock bajo" }));
    let client = client_over(&transport);
    let records = client.alerts().record();

    assert!(records.load(RecordId(3)).await.record.is_some());
    client.alerts().deleter().delete(RecordId(3)).await.unwrap();
    assert!(records.load(RecordId(3)).await.record.is_none());
}

#[tokio::test]
async fn mutations_leave_other_resources_fresh() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    client.roles().collection().load().await;

    client
        .areas()
        .creator()
        .create(&NewArea {
            nombre: "Nueva".into(),
            descripcion: None,
        })
        .await
        .unwrap();

    let state = client
        .query()
        .state(&inventa_client::QueryKey::List(ResourceKind::Role));
    assert!(!state.stale);
}

// ── Inventory form validation ───────────────────────────────────────

#[tokio::test]
async fn create_from_form_rejects_before_dispatch() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    let err = client
        .inventory()
        .creator()
        .create_from_form(&json!({ "stock": "5", "sitio_id": 1, "material_id": 2 }))
        .await
        .unwrap_err();
    let fields = err.field_errors().expect("field errors");
    assert!(fields.contains("stock"));
    assert!(transport.dispatched().is_empty());
}

#[tokio::test]
async fn create_from_form_dispatches_validated_draft() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    let item: InventoryItem = client
        .inventory()
        .creator()
        .create_from_form(&json!({ "stock": 5, "sitio_id": 1, "material_id": 2 }))
        .await
        .unwrap();
    assert_eq!(item.stock, 5);
    assert_eq!(
        transport.dispatched()[0].body,
        Some(json!({ "stock": 5, "sitio_id": 1, "material_id": 2 }))
    );
}

#[tokio::test]
async fn update_from_form_pins_explicit_id() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);

    client
        .inventory()
        .updater()
        .update_from_form(
            RecordId(10),
            &json!({ "id": 77, "stock": 2, "sitio_id": 1, "material_id": 2, "placa": "P-1" }),
        )
        .await
        .unwrap();
    let body = transport.dispatched()[0].body.clone().unwrap();
    assert_eq!(body["id"], json!(10));
    assert_eq!(body["placa"], json!("P-1"));
    assert_eq!(body["descripcion"], Value::Null);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_mutations_dispatch_in_call_order() {
    let transport = Arc::new(ScriptedTransport::default());
    let client = client_over(&transport);
    let creator = client.areas().creator();

    let first = NewArea {
        nombre: "primera".into(),
        descripcion: None,
    };
    let second = NewArea {
        nombre: "segunda".into(),
        descripcion: None,
    };
    let (a, b) = tokio::join!(creator.create(&first), creator.create(&second));
    assert!(a.is_ok() && b.is_ok());

    let names: Vec<Value> = transport
        .dispatched()
        .iter()
        .map(|d| d.body.as_ref().unwrap()["nombre"].clone())
        .collect();
    assert_eq!(names, vec![json!("primera"), json!("segunda")]);
    assert!(transport.dispatched().iter().all(|d| d.kind == ResourceKind::Area));
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn auth_passes_session_through_and_sign_out_clears_queries() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.seed(ResourceKind::Area, json!({ "id": 1, "nombre": "Compras" }));
    let session = SessionContext::new();
    let client = InventaClient::with_transport(transport.clone(), session.clone()).unwrap();

    session.sign_in(
        User {
            id: RecordId(5),
            nombre: "Luis".into(),
            correo: "luis@example.com".into(),
            rol_id: None,
            activo: true,
        },
        "token",
    );
    assert_eq!(client.auth(), session.auth());
    assert!(client.auth().is_authenticated);

    assert_eq!(client.areas().collection().load().await.len(), 1);
    client.sign_out();
    assert!(!client.auth().is_authenticated);
    assert!(client.areas().collection().snapshot().is_empty());
}
