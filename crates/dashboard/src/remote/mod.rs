//! Admin backend integration
//!
//! This module provides:
//! - The HTTP transport seam (ureq in production, scripted in tests)
//! - The remote client that authenticates, recovers once from 401/403 and
//!   unwraps the response envelope

mod client;
mod scripted;
mod transport;

pub use client::{RemoteClient, RequestOptions};
pub use scripted::ScriptedTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError, UreqTransport};

/// Backend wire types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Envelope wrapping every backend response
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Envelope<T> {
        pub success: bool,
        #[serde(default)]
        pub data: Option<T>,
        #[serde(default)]
        pub error: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
    }

    impl<T> Envelope<T> {
        /// Human-readable failure text (`error`, else `message`)
        pub fn failure_text(&self) -> String {
            self.error
                .clone()
                .or_else(|| self.message.clone())
                .unwrap_or_else(|| "Request was not successful".to_string())
        }
    }
}
