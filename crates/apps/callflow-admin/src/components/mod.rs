//! Terminal rendering helpers

mod status_line;
mod table;

pub use status_line::{error_banner, status_line};
pub use table::Table;
