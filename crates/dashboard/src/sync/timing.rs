//! Sync timing utilities for guard and staleness checks
//!
//! Pure functions that can be tested without a runtime.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

/// Check if enough time has elapsed since the last fetch started to allow a new one.
///
/// # Arguments
/// * `last_invoked_at` - When the previous fetch started (None if never fetched)
/// * `now` - Current instant
/// * `min_interval` - Minimum time that must elapse between fetch starts
///
/// # Returns
/// `true` if enough time has passed (or never fetched), `false` if still inside the window
pub fn interval_elapsed(last_invoked_at: Option<Instant>, now: Instant, min_interval: Duration) -> bool {
    match last_invoked_at {
        Some(last) => now.saturating_duration_since(last) >= min_interval,
        None => true,
    }
}

/// Check whether data fetched at `last_fetched_at` is older than `max_age`.
///
/// Never-fetched data is stale.
pub fn is_stale(last_fetched_at: Option<DateTime<Utc>>, max_age: Duration) -> bool {
    match last_fetched_at {
        Some(fetched) => {
            let age = Utc::now() - fetched;
            age.to_std().is_ok_and(|age| age > max_age)
        }
        None => true,
    }
}
