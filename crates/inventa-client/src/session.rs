// SPDX-License-Identifier: BUSL-1.1
//! # Session Context
//!
//! The authentication state shared by every accessor of one client. It is
//! an explicit value passed into [`InventaClient`](crate::InventaClient),
//! never a process-wide global.
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──begin_sign_in()──▶ loading ──sign_in(user, token)──▶ authenticated
//!                              │                                   │
//!                              └──fail_sign_in()──▶ signed out ◀──sign_out()
//! ```
//!
//! The bearer token is held in [`Zeroizing`] storage and never appears in
//! `Debug` output.

use std::sync::Arc;

use inventa_core::User;
use parking_lot::RwLock;
use zeroize::Zeroizing;

/// The authentication triple exposed to consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub loading: bool,
    pub user: Option<User>,
}

#[derive(Default)]
struct Inner {
    state: AuthState,
    token: Option<Zeroizing<String>>,
}

/// Cloneable handle to one session. All clones share the same state.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Inner>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SessionContext")
            .field("state", &inner.state)
            .field("token", &inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl SessionContext {
    /// A signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a sign-in as in progress.
    pub fn begin_sign_in(&self) {
        self.inner.write().state.loading = true;
    }

    /// Complete a sign-in: store the user and bearer token.
    pub fn sign_in(&self, user: User, token: impl Into<String>) {
        let mut inner = self.inner.write();
        tracing::info!(user_id = %user.id, "session signed in");
        inner.state = AuthState {
            is_authenticated: true,
            loading: false,
            user: Some(user),
        };
        inner.token = Some(Zeroizing::new(token.into()));
    }

    /// Abandon an in-progress sign-in.
    pub fn fail_sign_in(&self) {
        let mut inner = self.inner.write();
        inner.state = AuthState::default();
        inner.token = None;
    }

    /// Tear the session down: user and token are dropped.
    pub fn sign_out(&self) {
        let mut inner = self.inner.write();
        if inner.state.is_authenticated {
            tracing::info!("session signed out");
        }
        inner.state = AuthState::default();
        inner.token = None;
    }

    /// Snapshot of `{ is_authenticated, loading, user }`.
    pub fn auth(&self) -> AuthState {
        self.inner.read().state.clone()
    }

    pub(crate) fn bearer_token(&self) -> Option<Zeroizing<String>> {
        self.inner.read().token.clone()
    }
}
