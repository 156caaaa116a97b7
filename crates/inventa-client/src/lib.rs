// SPDX-License-Identifier: BUSL-1.1
//! # inventa-client: Resource Accessors for Inventa
//!
//! A thin, typed layer between UI code and the Inventa REST backend. Each
//! accessor wraps exactly one operation on exactly one resource and
//! normalizes its result:
//!
//! - reads return `{ items, loading }` / `{ record, loading }` and never a
//!   missing collection (see [`accessor`] for the normalization rule);
//! - mutations return the backend's record or the unmodified transport
//!   error, and invalidate the resource's cached queries once the backend
//!   accepts them.
//!
//! ## Architecture
//!
//! ```text
//! InventaClient ──▶ ResourceAccessors<R> ──▶ accessors ──▶ QueryClient ──▶ Transport
//!       │                                        │                          (HttpTransport)
//!       └── SessionContext (auth)                └── Resources<R> (typed API)
//! ```
//!
//! The client holds no threads and spawns no tasks. All suspension happens
//! inside the transport's request.

#![warn(missing_docs)]

pub mod accessor;
pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod transport;

pub use accessor::{
    Collection, CollectionAccessor, CollectionWithError, CreateAccessor, DeleteAccessor, Record,
    RecordAccessor, UpdateAccessor,
};
pub use api::{ResourceApi, Resources};
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use query::{QueryClient, QueryKey, QueryState};
pub use session::{AuthState, SessionContext};
pub use transport::{HttpTransport, Transport};

use std::marker::PhantomData;
use std::sync::Arc;

use inventa_core::{
    Alert, Area, Center, Feature, InventoryItem, ItemCategory, Material, Module, Movement,
    Municipality, Permission, Program, Resource, Role, Site, SiteType, User,
};
use inventa_schema::SchemaValidator;

/// Composition root: one session, one transport, one query store.
///
/// Cheaply cloneable; clones share all state.
#[derive(Debug, Clone)]
pub struct InventaClient {
    session: SessionContext,
    query: Arc<QueryClient>,
    schema: Arc<SchemaValidator>,
}

impl InventaClient {
    /// Connect to the backend described by `config` over HTTP.
    pub fn new(config: ApiConfig, session: SessionContext) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config, session.clone())?;
        Self::with_transport(Arc::new(transport), session)
    }

    /// Build a client over any transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        session: SessionContext,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            session,
            query: Arc::new(QueryClient::new(transport)),
            schema: Arc::new(SchemaValidator::new()?),
        })
    }

    /// Accessors for resource `R`.
    pub fn resource<R: Resource>(&self) -> ResourceAccessors<R> {
        ResourceAccessors {
            query: Arc::clone(&self.query),
            schema: Arc::clone(&self.schema),
            _resource: PhantomData,
        }
    }

    /// The authentication triple, passed through unchanged.
    pub fn auth(&self) -> AuthState {
        self.session.auth()
    }

    /// The session this client was built with.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Sign out and drop every cached query.
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.query.clear();
    }

    /// The shared query store.
    pub fn query(&self) -> &Arc<QueryClient> {
        &self.query
    }

    /// The compiled payload schemas.
    pub fn schema(&self) -> &SchemaValidator {
        &self.schema
    }

    /// Accessors for areas (`/api/areas`).
    pub fn areas(&self) -> ResourceAccessors<Area> {
        self.resource()
    }

    /// Accessors for sites (`/api/sitios`).
    pub fn sites(&self) -> ResourceAccessors<Site> {
        self.resource()
    }

    /// Accessors for site types (`/api/tipos-sitio`).
    pub fn site_types(&self) -> ResourceAccessors<SiteType> {
        self.resource()
    }

    /// Accessors for municipalities (`/api/municipios`).
    pub fn municipalities(&self) -> ResourceAccessors<Municipality> {
        self.resource()
    }

    /// Accessors for centers (`/api/centros`).
    pub fn centers(&self) -> ResourceAccessors<Center> {
        self.resource()
    }

    /// Accessors for materials (`/api/materiales`).
    pub fn materials(&self) -> ResourceAccessors<Material> {
        self.resource()
    }

    /// Accessors for item categories (`/api/categorias`).
    pub fn item_categories(&self) -> ResourceAccessors<ItemCategory> {
        self.resource()
    }

    /// Accessors for features (`/api/caracteristicas`).
    pub fn features(&self) -> ResourceAccessors<Feature> {
        self.resource()
    }

    /// Accessors for inventory items (`/api/inventario`).
    pub fn inventory(&self) -> ResourceAccessors<InventoryItem> {
        self.resource()
    }

    /// Accessors for stock movements (`/api/movimientos`).
    pub fn movements(&self) -> ResourceAccessors<Movement> {
        self.resource()
    }

    /// Accessors for modules (`/api/modulos`).
    pub fn modules(&self) -> ResourceAccessors<Module> {
        self.resource()
    }

    /// Accessors for permissions (`/api/permisos`).
    pub fn permissions(&self) -> ResourceAccessors<Permission> {
        self.resource()
    }

    /// Accessors for programs (`/api/programas`).
    pub fn programs(&self) -> ResourceAccessors<Program> {
        self.resource()
    }

    /// Accessors for roles (`/api/roles`).
    pub fn roles(&self) -> ResourceAccessors<Role> {
        self.resource()
    }

    /// Accessors for users (`/api/usuarios`).
    pub fn users(&self) -> ResourceAccessors<User> {
        self.resource()
    }

    /// Accessors for alerts (`/api/alertas`).
    pub fn alerts(&self) -> ResourceAccessors<Alert> {
        self.resource()
    }
}

/// Factory for the accessors of one resource.
pub struct ResourceAccessors<R> {
    query: Arc<QueryClient>,
    schema: Arc<SchemaValidator>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceAccessors<R> {
    /// Cached list of every record.
    pub fn collection(&self) -> CollectionAccessor<R> {
        CollectionAccessor::new(Arc::clone(&self.query))
    }

    /// Cached single record by id.
    pub fn record(&self) -> RecordAccessor<R> {
        RecordAccessor::new(Arc::clone(&self.query))
    }

    /// POST new records; invalidates cached queries for this resource.
    pub fn creator(&self) -> CreateAccessor<R> {
        CreateAccessor::new(Arc::clone(&self.query), Arc::clone(&self.schema))
    }

    /// PUT merged changes; invalidates cached queries for this resource.
    pub fn updater(&self) -> UpdateAccessor<R> {
        UpdateAccessor::new(Arc::clone(&self.query), Arc::clone(&self.schema))
    }

    /// DELETE by id; invalidates cached queries for this resource.
    pub fn deleter(&self) -> DeleteAccessor<R> {
        DeleteAccessor::new(Arc::clone(&self.query))
    }

    /// The strict typed API, bypassing the query store.
    pub fn api(&self) -> Resources<R> {
        Resources::new(Arc::clone(self.query.transport()))
    }
}
