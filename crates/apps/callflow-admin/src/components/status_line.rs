//! Status and error lines shown above a resource

use chrono::Local;
use dashboard::{ResourceState, ResourceStatus, is_stale};
use std::time::Duration;

/// Data older than this is flagged in the status line
const STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// One-line summary of a resource's sync status
pub fn status_line<T>(label: &str, state: &ResourceState<T>) -> String {
    let fetched = match state.last_fetched_at {
        Some(at) => {
            let time = at.with_timezone(&Local).format("%H:%M:%S");
            if is_stale(Some(at), STALE_AFTER) {
                format!("{} (stale)", time)
            } else {
                time.to_string()
            }
        }
        None => "never".to_string(),
    };

    let status = match state.status {
        ResourceStatus::Idle => "idle",
        ResourceStatus::Loading => "loading",
        ResourceStatus::Ready => "ready",
        ResourceStatus::Error => "error",
    };

    format!("{} [{}] last updated {}", label, status, fetched)
}

/// Non-blocking error banner; data from the last good fetch is still shown below it
pub fn error_banner<T>(state: &ResourceState<T>) -> Option<String> {
    let error = state.last_error.as_ref()?;
    let suffix = if state.has_value() {
        " (showing last loaded data)"
    } else {
        ""
    };
    Some(format!("! {}{}", error, suffix))
}
