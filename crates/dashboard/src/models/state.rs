//! Client-side state for synced resources

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

use super::RemoteError;
use crate::sync::interval_elapsed;

/// Values a controller can hold.
///
/// `looks_empty` is the caller-defined emptiness predicate used by the
/// protected-update rule: an empty refresh never replaces a non-empty value
/// unless the load explicitly accepts empty results.
pub trait SyncValue: Clone + Send + Sync + 'static {
    fn looks_empty(&self) -> bool {
        false
    }
}

impl<T: Clone + Send + Sync + 'static> SyncValue for Vec<T> {
    fn looks_empty(&self) -> bool {
        self.is_empty()
    }
}

impl<T: SyncValue> SyncValue for Option<T> {
    fn looks_empty(&self) -> bool {
        self.as_ref().is_none_or(SyncValue::looks_empty)
    }
}

impl SyncValue for serde_json::Value {
    fn looks_empty(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

/// Lifecycle of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What a view renders for one resource.
///
/// `value` survives failed and suspiciously empty refreshes, so a view in
/// `Error` status can still show the last good data next to the error.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub value: Option<T>,
    pub status: ResourceStatus,
    pub last_error: Option<RemoteError>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            value: None,
            status: ResourceStatus::Idle,
            last_error: None,
            last_fetched_at: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == ResourceStatus::Loading
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// De-duplication state for one resource key
#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    last_invoked_at: Option<Instant>,
    min_interval: Duration,
    in_flight: bool,
}

impl FetchGuard {
    /// Claim the guard for a new fetch.
    ///
    /// Returns `false` (and changes nothing) while a fetch is in flight or
    /// when the previous fetch started less than `min_interval` ago.
    pub fn try_begin(&mut self, now: Instant, min_interval: Duration) -> bool {
        if self.in_flight || !interval_elapsed(self.last_invoked_at, now, min_interval) {
            return false;
        }
        self.in_flight = true;
        self.last_invoked_at = Some(now);
        self.min_interval = min_interval;
        true
    }

    /// Release the guard after a fetch settles
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_invoked_at(&self) -> Option<Instant> {
        self.last_invoked_at
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Load bookkeeping for one lazily fetched section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionLoadState {
    /// Set on first activation; stays set after success so "tried and got
    /// nothing" is distinguishable from "never tried"
    pub attempted: bool,
    pub loading: bool,
}
