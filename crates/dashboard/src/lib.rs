//! Dashboard crate - Data-sync core for the CallFlowHQ admin dashboard
//!
//! This crate provides platform-independent sync functionality including:
//! - Remote client for the admin REST backend (bearer auth, bounded
//!   401/403 recovery, envelope decoding)
//! - Auth context with a readiness gate
//! - Resource sync controller with fetch de-duplication and protected updates
//! - On-demand section loading and fixed-interval auto-refresh
//! - Typed endpoints for organizations, users, plans, tickets and friends
//!
//! This crate has zero UI dependencies; views only read controller state.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod remote;
pub mod sync;

pub use api::DashboardApi;
pub use auth::{AuthContext, StaticTokenProvider, StoredToken, StoredTokenProvider, TokenProvider, token_subject};
pub use config::ApiSettings;
pub use models::{
    Activity, ErrorKind, FetchGuard, ImpersonationSession, ListParams, Organization, Page,
    Pagination, Parameter, Plan, PlatformUser, RemoteError, RemoteResult, ResourceState,
    ResourceStatus, SectionLoadState, SupportTicket, SyncValue, User,
};
pub use remote::{
    HttpRequest, HttpResponse, HttpTransport, Method, RemoteClient, RequestOptions,
    ScriptedTransport, TransportError, UreqTransport,
};
pub use sync::{
    AutoRefresh, Fetcher, LoadOptions, LoadOutcome, ResourceController, SectionLoader,
    SectionPhase, fetcher, interval_elapsed, is_stale,
};
