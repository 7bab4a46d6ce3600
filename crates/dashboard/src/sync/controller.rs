//! Resource sync controller
//!
//! Owns the [`ResourceState`] and [`FetchGuard`] of one resource key.

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, info};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::auth::AuthContext;
use crate::models::{FetchGuard, RemoteError, RemoteResult, ResourceState, ResourceStatus, SyncValue};

/// Produces one fetch of a resource
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, RemoteResult<T>> + Send + Sync>;

/// Wrap an async closure as a [`Fetcher`]
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RemoteResult<T>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Per-call load options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Minimum time between fetch starts for this key
    pub min_interval: Duration,
    /// Accept an empty result even when non-empty data is already loaded
    pub empty_is_valid: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            min_interval: Self::DEFAULT_MIN_INTERVAL,
            empty_is_valid: false,
        }
    }
}

impl LoadOptions {
    pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1000);

    /// No debounce window; only the in-flight check applies
    pub fn immediate() -> Self {
        Self {
            min_interval: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn accept_empty(mut self, empty_is_valid: bool) -> Self {
        self.empty_is_valid = empty_is_valid;
        self
    }
}

/// What a call to [`ResourceController::load`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch ran and the state settled in this status
    Completed(ResourceStatus),
    /// Dropped by the guard (in flight or inside the debounce window)
    Suppressed,
    /// The fetch ran but the controller was reset meanwhile; result discarded
    Stale,
    /// `reload` was called before any `load`
    NoPriorLoad,
}

struct Inner<T> {
    guard: FetchGuard,
    last_request: Option<(Fetcher<T>, LoadOptions)>,
    generation: u64,
}

/// Fetches one resource and merges results into a protected state.
///
/// Cloning yields another handle to the same resource.
#[derive(Clone)]
pub struct ResourceController<T: SyncValue> {
    key: Arc<str>,
    auth: Arc<AuthContext>,
    auth_wait: Duration,
    inner: Arc<Mutex<Inner<T>>>,
    state: Arc<watch::Sender<ResourceState<T>>>,
}

impl<T: SyncValue> ResourceController<T> {
    /// How long a load waits for a token provider by default
    pub const DEFAULT_AUTH_WAIT: Duration = Duration::from_millis(5000);

    /// Create an idle controller for `key`
    pub fn new(key: impl Into<String>, auth: Arc<AuthContext>) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            key: Arc::from(key.into()),
            auth,
            auth_wait: Self::DEFAULT_AUTH_WAIT,
            inner: Arc::new(Mutex::new(Inner {
                guard: FetchGuard::default(),
                last_request: None,
                generation: 0,
            })),
            state: Arc::new(state),
        }
    }

    /// Override how long loads wait for the auth gate
    pub fn with_auth_wait(mut self, auth_wait: Duration) -> Self {
        self.auth_wait = auth_wait;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().guard.is_in_flight()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the resource unless the guard suppresses the call.
    ///
    /// Never fails: errors land in `last_error`, and the previously loaded
    /// value is kept on failure and on an unaccepted empty result.
    pub async fn load(&self, fetcher: Fetcher<T>, options: LoadOptions) -> LoadOutcome {
        let (generation, previous_status) = {
            let mut inner = self.lock();

            // A suppressed call leaves everything untouched, including what reload repeats
            if !inner.guard.try_begin(Instant::now(), options.min_interval) {
                debug!(
                    "[{}] load suppressed (in flight or within {:?})",
                    self.key, options.min_interval
                );
                return LoadOutcome::Suppressed;
            }
            inner.last_request = Some((fetcher.clone(), options));

            // Value stays visible while loading
            let previous_status = self.state.borrow().status;
            self.state.send_modify(|s| s.status = ResourceStatus::Loading);
            (inner.generation, previous_status)
        };

        let settle = Settle {
            controller: self,
            generation,
            previous_status,
            settled: false,
        };

        debug!("[{}] load started", self.key);

        // Auth timeout is recorded like any other failure; the fetcher never runs
        let result = if self.auth.wait_ready(self.auth_wait).await {
            fetcher().await
        } else {
            Err(RemoteError::auth_timeout(format!(
                "No token provider registered after {:?}",
                self.auth_wait
            )))
        };

        settle.apply(result, options)
    }

    /// Repeat the most recent `load` with the same fetcher and options
    pub async fn reload(&self) -> LoadOutcome {
        let last_request = self.lock().last_request.clone();
        match last_request {
            Some((fetcher, options)) => self.load(fetcher, options).await,
            None => LoadOutcome::NoPriorLoad,
        }
    }

    /// Return to `Idle` and forget the last request (the owning view went away).
    ///
    /// A fetch still in flight completes as [`LoadOutcome::Stale`] and leaves
    /// the state untouched.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.guard = FetchGuard::default();
        inner.last_request = None;
        self.state.send_replace(ResourceState::default());
        debug!("[{}] reset", self.key);
    }
}

/// Settles a started load exactly once, including on panic or cancellation
struct Settle<'a, T: SyncValue> {
    controller: &'a ResourceController<T>,
    generation: u64,
    previous_status: ResourceStatus,
    settled: bool,
}

impl<T: SyncValue> Settle<'_, T> {
    fn apply(mut self, result: RemoteResult<T>, options: LoadOptions) -> LoadOutcome {
        self.settled = true;
        let controller = self.controller;
        let key = &controller.key;

        let mut inner = controller.lock();
        if inner.generation != self.generation {
            debug!("[{}] discarding result of a load started before reset", key);
            return LoadOutcome::Stale;
        }
        inner.guard.finish();

        let status = match result {
            Ok(value) => {
                controller.state.send_modify(|s| {
                    let keep_previous = value.looks_empty()
                        && !options.empty_is_valid
                        && s.value.as_ref().is_some_and(|v| !v.looks_empty());
                    if keep_previous {
                        info!("[{}] empty refresh ignored; keeping loaded data", key);
                    } else {
                        s.value = Some(value);
                    }
                    s.status = ResourceStatus::Ready;
                    s.last_error = None;
                    s.last_fetched_at = Some(Utc::now());
                });
                ResourceStatus::Ready
            }
            Err(error) => {
                debug!("[{}] load failed: {}", key, error);
                controller.state.send_modify(|s| {
                    s.status = ResourceStatus::Error;
                    s.last_error = Some(error);
                });
                ResourceStatus::Error
            }
        };

        debug!("[{}] load finished: {:?}", key, status);
        LoadOutcome::Completed(status)
    }
}

impl<T: SyncValue> Drop for Settle<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let controller = self.controller;
        let mut inner = controller.lock();
        if inner.generation != self.generation {
            return;
        }
        inner.guard.finish();
        let previous_status = self.previous_status;
        controller.state.send_modify(|s| {
            if s.status == ResourceStatus::Loading {
                s.status = previous_status;
            }
        });
        debug!("[{}] load abandoned before completion", controller.key);
    }
}
