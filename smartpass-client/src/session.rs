//! Where bearer tokens come from
//!
//! The HTTP layer asks a [`SessionProvider`] for a token on every
//! authenticated request and never stores one itself. Login and logout are
//! the host application's business; it swaps the token inside a
//! [`SharedSession`] and every clone of the client sees the change.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Source of the bearer token for authenticated calls
pub trait SessionProvider: Send + Sync + fmt::Debug {
    /// Current token, `None` when signed out
    fn bearer_token(&self) -> Option<String>;
}

/// Never authenticated; only public endpoints will succeed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionProvider for NoSession {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, e.g. from `SMARTPASS_TOKEN`
#[derive(Clone)]
pub struct StaticSession(String);

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl SessionProvider for StaticSession {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl fmt::Debug for StaticSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticSession(***)")
    }
}

/// Token that can be replaced while the client is in use
#[derive(Clone, Default)]
pub struct SharedSession {
    token: Arc<RwLock<Option<String>>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token from a successful login
    pub fn sign_in(&self, token: impl Into<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn sign_out(&self) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer_token().is_some()
    }
}

impl SessionProvider for SharedSession {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSession")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}
