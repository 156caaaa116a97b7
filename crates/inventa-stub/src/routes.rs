// SPDX-License-Identifier: BUSL-1.1
//! Route definitions for the Inventa stub backend.
//!
//! Implements the REST surface `inventa-client` calls. Stored rows are
//! canonical: every create and update is decoded into the resource's typed
//! record before it is written, so reads always deserialize cleanly on the
//! client.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use inventa_core::{
    merge_identifier, Alert, Area, Center, CoreError, Feature, InventoryItem, ItemCategory,
    Material, Module, Movement, Municipality, Permission, Program, RecordId, Resource,
    ResourceKind, Role, Site, SiteType, User, ID_FIELD,
};
use serde_json::Value;

use crate::error::AppError;
use crate::store::AppState;

/// Call `$func::<R>(args)` with `R` the record type of `$kind`.
macro_rules! for_kind {
    ($kind:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $kind {
            ResourceKind::Area => $func::<Area>($($arg),*),
            ResourceKind::Site => $func::<Site>($($arg),*),
            ResourceKind::SiteType => $func::<SiteType>($($arg),*),
            ResourceKind::Municipality => $func::<Municipality>($($arg),*),
            ResourceKind::Center => $func::<Center>($($arg),*),
            ResourceKind::Material => $func::<Material>($($arg),*),
            ResourceKind::ItemCategory => $func::<ItemCategory>($($arg),*),
            ResourceKind::Feature => $func::<Feature>($($arg),*),
            ResourceKind::Inventory => $func::<InventoryItem>($($arg),*),
            ResourceKind::Movement => $func::<Movement>($($arg),*),
            ResourceKind::Module => $func::<Module>($($arg),*),
            ResourceKind::Permission => $func::<Permission>($($arg),*),
            ResourceKind::Program => $func::<Program>($($arg),*),
            ResourceKind::Role => $func::<Role>($($arg),*),
            ResourceKind::User => $func::<User>($($arg),*),
            ResourceKind::Alert => $func::<Alert>($($arg),*),
        }
    };
}

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/:resource", get(list).post(create))
        .route(
            "/api/:resource/:id",
            get(fetch_one).put(update).delete(remove),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

// ── Path resolution ─────────────────────────────────────────────────

fn resolve<'a>(
    state: &'a AppState,
    segment: &str,
) -> Result<(ResourceKind, &'a DashMap<RecordId, Value>), AppError> {
    let kind: ResourceKind = segment.parse()?;
    let table = state
        .table(kind)
        .ok_or_else(|| AppError::Internal(format!("no table for {kind}")))?;
    Ok((kind, table))
}

fn parse_id(kind: ResourceKind, raw: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("{kind} {raw}")))
}

fn ensure_object(body: &Value) -> Result<(), AppError> {
    if body.is_object() {
        Ok(())
    } else {
        Err(AppError::invalid_body("request body must be a JSON object"))
    }
}

// ── Handlers ────────────────────────────────────────────────────────

async fn list(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (kind, _) = resolve(&state, &segment)?;
    Ok(Json(Value::Array(state.sorted_rows(kind))))
}

async fn fetch_one(
    State(state): State<AppState>,
    Path((segment, raw_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let (kind, table) = resolve(&state, &segment)?;
    let id = parse_id(kind, &raw_id)?;
    table
        .get(&id)
        .map(|entry| Json(entry.value().clone()))
        .ok_or_else(|| AppError::NotFound(format!("{kind} {id}")))
}

async fn create(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let (kind, table) = resolve(&state, &segment)?;
    let (id, record) = for_kind!(kind, build_created(&state, body))?;
    table.insert(id, record.clone());
    tracing::info!(resource = %kind, %id, "record created");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

async fn update(
    State(state): State<AppState>,
    Path((segment, raw_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let (kind, table) = resolve(&state, &segment)?;
    let id = parse_id(kind, &raw_id)?;
    // The row lock spans read, merge and write; a delete lands before or after.
    let mut row = table
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("{kind} {id}")))?;
    let record = for_kind!(kind, build_updated(&state, row.value().clone(), id, body))?;
    *row.value_mut() = record.clone();
    drop(row);
    tracing::info!(resource = %kind, %id, "record updated");
    Ok(Json(record))
}

async fn remove(
    State(state): State<AppState>,
    Path((segment, raw_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (kind, table) = resolve(&state, &segment)?;
    let id = parse_id(kind, &raw_id)?;
    match table.remove(&id) {
        Some(_) => {
            tracing::info!(resource = %kind, %id, "record deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound(format!("{kind} {id}"))),
    }
}

// ── Typed row construction ──────────────────────────────────────────

/// Validate a creation body and assign it a fresh id. Any `id` the body
/// carries is ignored.
fn build_created<R: Resource>(state: &AppState, body: Value) -> Result<(RecordId, Value), AppError> {
    ensure_object(&body)?;
    if state.schema().has_schema(R::KIND) {
        state.schema().validate_document(R::KIND, &body)?;
    }
    let draft: R::Draft =
        serde_json::from_value(body).map_err(|e| AppError::invalid_body(e.to_string()))?;
    let id = state.next_id();
    Ok((id, merge_identifier(id, &draft)?))
}

/// Overlay `body` on the stored row, pin the id to the path, and re-check
/// the result as a full record.
fn build_updated<R: Resource>(
    state: &AppState,
    existing: Value,
    id: RecordId,
    body: Value,
) -> Result<Value, AppError> {
    ensure_object(&body)?;
    let mut merged = existing;
    if let (Some(row), Value::Object(updates)) = (merged.as_object_mut(), body) {
        row.extend(updates);
        row.insert(ID_FIELD.to_string(), Value::from(id.get()));
    }
    if state.schema().has_schema(R::KIND) {
        state.schema().validate_document(R::KIND, &merged)?;
    }
    let record: R =
        serde_json::from_value(merged).map_err(|e| AppError::invalid_body(e.to_string()))?;
    Ok(serde_json::to_value(&record).map_err(CoreError::from)?)
}
