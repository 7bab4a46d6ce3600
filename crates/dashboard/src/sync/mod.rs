//! Resource synchronisation for views
//!
//! A controller owns one remote resource: it de-duplicates fetch triggers,
//! waits for credentials, and merges results without letting a failed or
//! suspiciously empty refresh wipe data the view already shows.

mod controller;
mod refresh;
mod section;
mod timing;

pub use controller::{Fetcher, LoadOptions, LoadOutcome, ResourceController, fetcher};
pub use refresh::AutoRefresh;
pub use section::{SectionLoader, SectionPhase};
pub use timing::{interval_elapsed, is_stale};
