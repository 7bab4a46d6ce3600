//! On-demand section loading
//!
//! A section (a detail tab, say) fetches its data the first time it becomes
//! visible. Later activations are no-ops; only an explicit retry re-fetches.

use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::controller::{Fetcher, LoadOptions, LoadOutcome, ResourceController};
use crate::models::{ResourceState, ResourceStatus, SectionLoadState, SyncValue};

/// Where a section is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionPhase {
    /// Never activated
    Unvisited,
    /// Activated, fetch not settled yet
    Pending,
    /// Fetch settled; the view renders from the controller state
    Settled(ResourceStatus),
}

#[derive(Default)]
struct SectionInner {
    attempted: bool,
    pending: usize,
}

/// Lazily loads one section's data through its own controller
#[derive(Clone)]
pub struct SectionLoader<T: SyncValue> {
    controller: ResourceController<T>,
    fetcher: Fetcher<T>,
    options: LoadOptions,
    inner: Arc<Mutex<SectionInner>>,
}

impl<T: SyncValue> SectionLoader<T> {
    /// Create a section backed by `controller`.
    ///
    /// Sections load with [`LoadOptions::immediate`] so a retry is never
    /// swallowed by a debounce window.
    pub fn new(controller: ResourceController<T>, fetcher: Fetcher<T>) -> Self {
        Self {
            controller,
            fetcher,
            options: LoadOptions::immediate(),
            inner: Arc::new(Mutex::new(SectionInner::default())),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn key(&self) -> &str {
        self.controller.key()
    }

    pub fn controller(&self) -> &ResourceController<T> {
        &self.controller
    }

    /// Snapshot of the section's data
    pub fn state(&self) -> ResourceState<T> {
        self.controller.state()
    }

    fn lock(&self) -> MutexGuard<'_, SectionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// An attempt counts while a load is pending or the controller holds its result.
    ///
    /// A controller back at `Idle` with nothing pending was reset, or its load
    /// was abandoned, so the section is unvisited again.
    fn is_attempted(&self, inner: &SectionInner) -> bool {
        inner.attempted
            && (inner.pending > 0 || self.controller.state().status != ResourceStatus::Idle)
    }

    /// Attempt/loading flags
    pub fn load_state(&self) -> SectionLoadState {
        let inner = self.lock();
        SectionLoadState {
            attempted: self.is_attempted(&inner),
            loading: inner.pending > 0,
        }
    }

    pub fn phase(&self) -> SectionPhase {
        let load_state = self.load_state();
        if !load_state.attempted {
            return SectionPhase::Unvisited;
        }
        let state = self.controller.state();
        if load_state.loading || state.is_loading() || state.status == ResourceStatus::Idle {
            SectionPhase::Pending
        } else {
            SectionPhase::Settled(state.status)
        }
    }

    /// Load the section the first time it is shown.
    ///
    /// Returns `None` when the section was already attempted.
    pub async fn activate(&self) -> Option<LoadOutcome> {
        {
            let mut inner = self.lock();
            if self.is_attempted(&inner) {
                return None;
            }
            inner.attempted = true;
            inner.pending += 1;
        }

        debug!("[{}] section activated", self.key());
        let pending = PendingMark { section: self };
        let outcome = self
            .controller
            .load(self.fetcher.clone(), self.options)
            .await;
        drop(pending);
        Some(outcome)
    }

    /// Forget the previous attempt and load again
    pub async fn retry(&self) -> Option<LoadOutcome> {
        self.lock().attempted = false;
        debug!("[{}] section retry requested", self.key());
        self.activate().await
    }
}

/// Decrements the pending count however the load future ends
struct PendingMark<'a, T: SyncValue> {
    section: &'a SectionLoader<T>,
}

impl<T: SyncValue> Drop for PendingMark<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.section.lock();
        inner.pending = inner.pending.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthContext, StaticTokenProvider};
    use crate::models::RemoteError;
    use crate::sync::fetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_section(calls: &Arc<AtomicUsize>, fail_first: bool) -> SectionLoader<Vec<u32>> {
        let auth = Arc::new(AuthContext::with_provider(Arc::new(StaticTokenProvider::new("tok"))));
        let controller = ResourceController::new("org_1/users", auth);
        let calls = calls.clone();
        let fetch = fetcher(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if fail_first && n == 0 {
                    Err(RemoteError::transport("offline"))
                } else {
                    Ok(Vec::new())
                }
            }
        });
        SectionLoader::new(controller, fetch)
    }

    #[tokio::test]
    async fn test_section_starts_unvisited() {
        let calls = Arc::new(AtomicUsize::new(0));
        let section = make_section(&calls, false);
        assert_eq!(section.phase(), SectionPhase::Unvisited);
        assert_eq!(section.load_state(), SectionLoadState::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_activate_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let section = make_section(&calls, false);

        let first = section.activate().await;
        assert_eq!(first, Some(LoadOutcome::Completed(ResourceStatus::Ready)));
        assert!(section.load_state().attempted);
        assert!(!section.load_state().loading);

        // Empty result still counts as attempted
        assert_eq!(section.activate().await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(section.phase(), SectionPhase::Settled(ResourceStatus::Ready));
        assert_eq!(section.state().value, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_reset_controller_returns_section_to_unvisited() {
        let calls = Arc::new(AtomicUsize::new(0));
        let section = make_section(&calls, false);

        section.activate().await;
        section.controller().reset();

        assert_eq!(section.phase(), SectionPhase::Unvisited);
        assert!(!section.load_state().attempted);

        // Showing the section again loads it again
        assert!(section.activate().await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(section.phase(), SectionPhase::Settled(ResourceStatus::Ready));
    }

    #[tokio::test]
    async fn test_abandoned_activation_is_not_pending_forever() {
        let auth = Arc::new(AuthContext::with_provider(Arc::new(StaticTokenProvider::new("tok"))));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let rx = Arc::new(Mutex::new(Some(rx)));
        let fetch = fetcher(move || {
            let rx = rx.lock().unwrap().take();
            async move {
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
                Ok(vec![1u32])
            }
        });
        let section = SectionLoader::new(ResourceController::new("org_1/activity", auth), fetch);

        let mut pending = tokio_test::task::spawn(section.activate());
        tokio_test::assert_pending!(pending.poll());
        assert_eq!(section.phase(), SectionPhase::Pending);

        drop(pending);
        drop(tx);
        assert_eq!(section.phase(), SectionPhase::Unvisited);
        assert_eq!(
            section.activate().await,
            Some(LoadOutcome::Completed(ResourceStatus::Ready))
        );
    }

    #[tokio::test]
    async fn test_failed_section_stays_attempted_until_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let section = make_section(&calls, true);

        section.activate().await;
        assert_eq!(section.phase(), SectionPhase::Settled(ResourceStatus::Error));
        assert_eq!(section.activate().await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let retried = section.retry().await;
        assert_eq!(retried, Some(LoadOutcome::Completed(ResourceStatus::Ready)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(section.load_state().attempted);
        assert_eq!(section.phase(), SectionPhase::Settled(ResourceStatus::Ready));
    }
}
