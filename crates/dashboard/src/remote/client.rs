//! Authenticated client for the admin backend
//!
//! Every call resolves to a [`RemoteResult`]; expected failures are never
//! raised as panics or `anyhow` errors.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::api::Envelope;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::auth::{AuthContext, token_subject};
use crate::config::ApiSettings;
use crate::models::{RemoteError, RemoteResult};

/// Method, body and extra headers of one call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    fn with_method(method: Method, body: Option<Value>) -> Self {
        Self {
            method,
            body,
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::with_method(Method::Get, None)
    }

    pub fn post(body: Value) -> Self {
        Self::with_method(Method::Post, Some(body))
    }

    pub fn put(body: Value) -> Self {
        Self::with_method(Method::Put, Some(body))
    }

    pub fn patch(body: Value) -> Self {
        Self::with_method(Method::Patch, Some(body))
    }

    pub fn delete() -> Self {
        Self::with_method(Method::Delete, None)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for the admin REST backend
#[derive(Clone)]
pub struct RemoteClient {
    base_url: String,
    recovery_path: String,
    auth: Arc<AuthContext>,
    transport: Arc<dyn HttpTransport>,
}

impl RemoteClient {
    /// Header carrying the token subject
    pub const USER_ID_HEADER: &'static str = "X-User-Id";

    /// Create a client from validated settings
    pub fn new(
        settings: &ApiSettings,
        auth: Arc<AuthContext>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            recovery_path: settings.recovery_path.clone(),
            auth,
            transport,
        }
    }

    /// Create a client for `base_url` with the default recovery endpoint
    pub fn with_base_url(
        base_url: impl Into<String>,
        auth: Arc<AuthContext>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let settings = ApiSettings {
            base_url: base_url.into(),
            ..ApiSettings::default()
        };
        Self::new(&settings, auth, transport)
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// GET an authenticated endpoint
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> RemoteResult<T> {
        self.request(endpoint, &RequestOptions::get(), true).await
    }

    /// POST a JSON body to an authenticated endpoint
    pub async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> RemoteResult<T> {
        self.request(endpoint, &RequestOptions::post(body), true).await
    }

    /// PUT a JSON body to an authenticated endpoint
    pub async fn put<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> RemoteResult<T> {
        self.request(endpoint, &RequestOptions::put(body), true).await
    }

    /// DELETE an authenticated endpoint
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> RemoteResult<T> {
        self.request(endpoint, &RequestOptions::delete(), true).await
    }

    /// Issue one request and unwrap the envelope's `data`.
    ///
    /// On 401/403 (unless `endpoint` is the recovery endpoint itself) the
    /// recovery endpoint is called once; if it reports success the original
    /// request is retried exactly once.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        require_auth: bool,
    ) -> RemoteResult<T> {
        let response = self.send(endpoint, options, require_auth).await?;

        // Only 401/403 enters the recovery path
        if !response.is_auth_failure() {
            return Self::decode(response);
        }

        // Never recover from the recovery endpoint itself
        if self.is_recovery_endpoint(endpoint) {
            return Err(RemoteError::unauthorized(format!(
                "Recovery endpoint rejected credentials (HTTP {})",
                response.status
            )));
        }

        info!(
            "{} {} returned HTTP {}; attempting credential recovery",
            options.method, endpoint, response.status
        );
        if !self.recover().await {
            return Err(RemoteError::unauthorized(format!(
                "HTTP {} and credential recovery failed",
                response.status
            )));
        }

        // Single retry; a second 401/403 is final
        let retried = self.send(endpoint, options, require_auth).await?;
        if retried.is_auth_failure() {
            warn!("{} {} still unauthorized after recovery", options.method, endpoint);
            return Err(RemoteError::unauthorized(format!(
                "HTTP {} after credential recovery",
                retried.status
            )));
        }
        Self::decode(retried)
    }

    /// Build and send one request, returning whatever the server answered
    async fn send(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        require_auth: bool,
    ) -> RemoteResult<HttpResponse> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        if require_auth {
            // Subject header is best-effort; the bearer header is not
            let token = self.bearer_token().await?;
            if let Some(subject) = token_subject(&token) {
                headers.push((Self::USER_ID_HEADER.to_string(), subject));
            }
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        headers.extend(options.headers.iter().cloned());

        let request = HttpRequest {
            method: options.method,
            url: self.url(endpoint),
            headers,
            body: options.body.as_ref().map(Value::to_string),
        };

        debug!("{} {}", request.method, request.url);
        self.transport
            .send(request)
            .await
            .map_err(|e| RemoteError::transport(e.to_string()))
    }

    async fn bearer_token(&self) -> RemoteResult<String> {
        let provider = self
            .auth
            .provider()
            .ok_or_else(|| RemoteError::auth_unavailable("No token provider registered"))?;

        match provider.token().await {
            Ok(Some(token)) if !token.is_empty() => Ok(token),
            Ok(_) => Err(RemoteError::auth_unavailable("Token provider returned no token")),
            Err(e) => Err(RemoteError::auth_unavailable(format!(
                "Token provider failed: {}",
                e
            ))),
        }
    }

    /// Call the recovery endpoint; true iff it reported success
    async fn recover(&self) -> bool {
        let options = RequestOptions::post(Value::Object(Default::default()));
        match self.send(&self.recovery_path, &options, true).await {
            Ok(response) if response.is_success() => {
                match serde_json::from_str::<Envelope<Value>>(&response.body) {
                    Ok(envelope) if envelope.success => {
                        info!("Credential recovery succeeded; retrying request");
                        true
                    }
                    Ok(envelope) => {
                        warn!("Credential recovery refused: {}", envelope.failure_text());
                        false
                    }
                    Err(e) => {
                        warn!("Credential recovery returned a malformed response: {}", e);
                        false
                    }
                }
            }
            Ok(response) => {
                warn!("Credential recovery failed with HTTP {}", response.status);
                false
            }
            Err(e) => {
                warn!("Credential recovery failed: {}", e);
                false
            }
        }
    }

    fn is_recovery_endpoint(&self, endpoint: &str) -> bool {
        let path = endpoint.split('?').next().unwrap_or(endpoint);
        path.trim_matches('/') == self.recovery_path.trim_matches('/')
    }

    /// Unwrap a non-auth-failure response
    fn decode<T: DeserializeOwned>(response: HttpResponse) -> RemoteResult<T> {
        if !response.is_success() {
            return Err(RemoteError::http(response.status));
        }

        let envelope: Envelope<Value> = serde_json::from_str(&response.body)
            .map_err(|e| RemoteError::api(format!("Malformed response: {}", e)))?;

        if !envelope.success {
            return Err(RemoteError::api(envelope.failure_text()));
        }

        serde_json::from_value(envelope.data.unwrap_or(Value::Null))
            .map_err(|e| RemoteError::api(format!("Malformed response data: {}", e)))
    }
}
