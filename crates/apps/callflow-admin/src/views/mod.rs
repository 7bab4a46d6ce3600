//! Screens rendered to the terminal

mod catalog;
mod list;
mod organization;

pub use catalog::{show_parameters, show_plans, show_platform_users, show_sessions, show_tickets};
pub use organization::{set_organization_status, show_organization, show_organizations};
