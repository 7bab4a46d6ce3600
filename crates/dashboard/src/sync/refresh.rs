//! Fixed-interval auto-refresh tied to a view's lifetime

use log::debug;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::controller::ResourceController;
use crate::models::SyncValue;

/// Periodically reloads a controller until stopped or dropped.
///
/// Must be started from within a tokio runtime.
pub struct AutoRefresh {
    handle: JoinHandle<()>,
    period: Duration,
}

impl AutoRefresh {
    /// Start reloading `controller` every `period`, first reload after one period
    pub fn start<T: SyncValue>(controller: ResourceController<T>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let outcome = controller.reload().await;
                debug!("[{}] auto-refresh: {:?}", controller.key(), outcome);
            }
        });
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop refreshing
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
