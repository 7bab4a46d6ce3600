//! In-memory transport that replays scripted responses
//!
//! Useful for tests and offline demos. Every request is recorded so callers
//! can assert on call counts and headers.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Transport answering from a queue of canned outcomes
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn push_response(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a `{"success": true, "data": ...}` response
    pub fn push_ok(&self, data: serde_json::Value) -> &Self {
        let body = serde_json::json!({ "success": true, "data": data });
        self.push_response(200, body.to_string())
    }

    /// Queue a `{"success": false, "error": ...}` response with status 200
    pub fn push_api_error(&self, error: &str) -> &Self {
        let body = serde_json::json!({ "success": false, "error": error });
        self.push_response(200, body.to_string())
    }

    /// Queue a network failure
    pub fn push_transport_error(&self, message: &str) -> &Self {
        self.push(Err(TransportError(message.to_string())))
    }

    fn push(&self, outcome: Result<HttpResponse, TransportError>) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(outcome);
        }
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Number of scripted outcomes not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let label = format!("{} {}", request.method, request.url);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(TransportError(format!("No scripted response for {}", label))))
    }
}
