//! Domain models for the dashboard sync core

mod resources;
mod result;
mod state;

pub use resources::{
    Activity, ImpersonationSession, ListParams, Organization, Page, Pagination, Parameter, Plan,
    PlatformUser, SupportTicket, User,
};
pub use result::{ErrorKind, RemoteError, RemoteResult};
pub use state::{FetchGuard, ResourceState, ResourceStatus, SectionLoadState, SyncValue};
