// SPDX-License-Identifier: BUSL-1.1
//! # inventa-stub: In-Memory Inventa Backend
//!
//! Serves the REST surface `inventa-client` calls, backed by DashMap tables
//! that live only as long as the process. Used for local development and
//! as the far end of the client's end-to-end tests.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET    | `/health` | 200 |
//! | GET    | `/api/{resource}` | array sorted by id |
//! | POST   | `/api/{resource}` | 201 + stored record |
//! | GET    | `/api/{resource}/{id}` | record, or 404 |
//! | PUT    | `/api/{resource}/{id}` | merged record, or 404 |
//! | DELETE | `/api/{resource}/{id}` | 204, or 404 |
//!
//! Rejected bodies get 422 with `{ "error": { code, message, fields } }`.

pub mod error;
pub mod routes;
pub mod store;

pub use error::AppError;
pub use routes::router;
pub use store::AppState;
