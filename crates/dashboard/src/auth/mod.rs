//! Credential plumbing
//!
//! This module provides:
//! - The auth context holding the registered token provider
//! - A readiness gate so fetches can wait for the provider to appear
//! - Token providers (static and file-backed)
//! - Best-effort subject extraction from bearer tokens

mod provider;
mod token;

pub use provider::{StaticTokenProvider, StoredToken, StoredTokenProvider, TokenProvider};
pub use token::token_subject;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

/// Holds the token provider shared by every client and controller.
///
/// Constructed once at bootstrap and passed down as `Arc<AuthContext>`.
/// The identity layer calls [`AuthContext::register`] once a session exists;
/// [`AuthContext::clear`] forces re-authentication (logout).
pub struct AuthContext {
    provider: RwLock<Option<Arc<dyn TokenProvider>>>,
    poll_interval: Duration,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    /// Interval at which [`AuthContext::wait_ready`] re-checks readiness
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Create a context with no provider registered
    pub fn new() -> Self {
        Self {
            provider: RwLock::new(None),
            poll_interval: Self::POLL_INTERVAL,
        }
    }

    /// Create a context that is ready immediately
    pub fn with_provider(provider: Arc<dyn TokenProvider>) -> Self {
        let ctx = Self::new();
        ctx.register(provider);
        ctx
    }

    /// Override the readiness poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    // Poisoned locks still hold a valid slot
    fn read(&self) -> RwLockReadGuard<'_, Option<Arc<dyn TokenProvider>>> {
        self.provider.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<dyn TokenProvider>>> {
        self.provider.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register (or replace) the token provider
    pub fn register(&self, provider: Arc<dyn TokenProvider>) {
        *self.write() = Some(provider);
        debug!("Token provider registered");
    }

    /// Drop the registered provider
    pub fn clear(&self) {
        *self.write() = None;
        debug!("Token provider cleared");
    }

    /// Currently registered provider, if any
    pub fn provider(&self) -> Option<Arc<dyn TokenProvider>> {
        self.read().clone()
    }

    /// True iff a token provider is registered
    pub fn is_ready(&self) -> bool {
        self.read().is_some()
    }

    /// Wait until a provider is registered or `timeout` elapses.
    ///
    /// Returns the final readiness. A timeout is a normal outcome; callers
    /// decide how to report it. Concurrent waiters poll independently.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_ready() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return self.is_ready();
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}
