//! Token providers
//!
//! A provider hands out the bearer token for each request. The identity
//! session that mints tokens lives outside this crate; providers only read
//! what it produced.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of bearer tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when no usable session exists
    async fn token(&self) -> Result<Option<String>>;
}

/// Provider returning a fixed token
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<Option<String>> {
        if self.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.token.clone()))
    }
}

/// Token data persisted by the login flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Provider backed by a JSON token file (~/.config/callflowhq/api-token.json)
pub struct StoredTokenProvider {
    token_path: PathBuf,
}

impl StoredTokenProvider {
    /// Token file name in the config directory
    pub const TOKEN_FILE: &'static str = "api-token.json";

    /// Tokens this close to expiry are treated as expired
    const EXPIRY_BUFFER_SECS: i64 = 300;

    /// Create a provider reading the default token file
    pub fn new() -> Result<Self> {
        let token_path =
            config::config_path(Self::TOKEN_FILE).context("Could not determine config directory")?;
        Ok(Self { token_path })
    }

    /// Create a provider reading an explicit token file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: path.into(),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the stored token from disk
    fn load_token(&self) -> Result<StoredToken> {
        config::load_json_file(&self.token_path)
    }

    /// Persist a token (used by the login command)
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        config::save_json_file(&self.token_path, token)
    }

    /// Check if a non-expired token is stored
    pub fn is_authenticated(&self) -> bool {
        self.load_token().is_ok_and(|token| Self::is_fresh(&token))
    }

    /// Clear the stored token (logout)
    pub fn logout(&self) -> Result<()> {
        config::remove_file(&self.token_path)
    }

    fn is_fresh(token: &StoredToken) -> bool {
        if token.access_token.is_empty() {
            return false;
        }
        match token.expires_at {
            Some(expires_at) => {
                expires_at > chrono::Utc::now().timestamp() + Self::EXPIRY_BUFFER_SECS
            }
            None => true,
        }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn token(&self) -> Result<Option<String>> {
        if !self.token_path.exists() {
            return Ok(None);
        }
        let token = self.load_token()?;
        if Self::is_fresh(&token) {
            Ok(Some(token.access_token))
        } else {
            Ok(None)
        }
    }
}
