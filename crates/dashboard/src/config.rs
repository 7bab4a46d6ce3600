//! Settings loading for the dashboard backend connection
//!
//! Supports loading settings from (in order of priority):
//! 1. Compile-time embedded base URL (for release builds)
//! 2. JSON file (~/.config/callflowhq/dashboard.json)
//! 3. Runtime environment variables, with defaults for anything unset

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings filename in the CallFlowHQ config directory
const SETTINGS_FILE: &str = "dashboard.json";

const ENV_BASE_URL: &str = "CALLFLOW_API_BASE";
const ENV_AUTH_WAIT_MS: &str = "CALLFLOW_AUTH_WAIT_MS";
const ENV_REQUEST_TIMEOUT_MS: &str = "CALLFLOW_REQUEST_TIMEOUT_MS";

/// Connection settings for the admin backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Bootstrap endpoint called once after a 401/403
    pub recovery_path: String,
    /// How long a load waits for a token provider to be registered
    pub auth_wait_ms: u64,
    /// Per-request timeout applied by the HTTP transport
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            recovery_path: Self::DEFAULT_RECOVERY_PATH.to_string(),
            auth_wait_ms: 5000,
            request_timeout_ms: 30_000,
        }
    }
}

impl ApiSettings {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";
    pub const DEFAULT_RECOVERY_PATH: &'static str = "/auth/setup-first-user";

    /// Load settings using the following priority:
    /// 1. Compile-time embedded base URL
    /// 2. JSON file (~/.config/callflowhq/dashboard.json)
    /// 3. Runtime environment variables
    pub fn load() -> Result<Self> {
        // Try compile-time embedded base URL first (release builds)
        let settings = if let Some(settings) = Self::from_compile_time() {
            settings
        // Then the settings file; missing fields fall back to defaults
        } else if config::config_exists(SETTINGS_FILE) {
            config::load_json(SETTINGS_FILE)?
        // Finally runtime environment variables
        } else {
            Self::from_env()?
        };

        // Every source goes through the same URL checks
        settings.validated()
    }

    /// Base URL embedded at compile time.
    /// Build with: CALLFLOW_API_BASE=https://api.example.com/api cargo build --release
    pub fn from_compile_time() -> Option<Self> {
        let base_url = option_env!("CALLFLOW_API_BASE")?;
        if base_url.is_empty() {
            return None;
        }
        Some(Self {
            base_url: base_url.to_string(),
            ..Self::default()
        })
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: Self = config::load_json_file(path)?;
        settings.validated()
    }

    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup, defaulting unset values
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            settings.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_AUTH_WAIT_MS) {
            settings.auth_wait_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", ENV_AUTH_WAIT_MS))?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            settings.request_timeout_ms = raw.trim().parse().with_context(|| {
                format!("{} must be a number of milliseconds", ENV_REQUEST_TIMEOUT_MS)
            })?;
        }

        Ok(settings)
    }

    /// Check the base URL and normalize paths
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(trimmed)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            bail!(
                "API base URL must use http:// or https:// and include a host: {}",
                self.base_url
            );
        }
        self.base_url = trimmed.to_string();

        // Recovery path is joined onto the base URL, so it needs a leading slash
        if self.recovery_path.trim().is_empty() {
            self.recovery_path = Self::DEFAULT_RECOVERY_PATH.to_string();
        } else if !self.recovery_path.starts_with('/') {
            self.recovery_path = format!("/{}", self.recovery_path);
        }

        Ok(self)
    }

    pub fn auth_wait(&self) -> Duration {
        Duration::from_millis(self.auth_wait_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Get the default settings file path (~/.config/callflowhq/dashboard.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = ApiSettings::from_vars(lookup(&[])).unwrap();
        assert_eq!(settings, ApiSettings::default());
        assert_eq!(settings.auth_wait(), Duration::from_millis(5000));
    }

    #[test]
    fn test_vars_override_defaults() {
        let settings = ApiSettings::from_vars(lookup(&[
            ("CALLFLOW_API_BASE", "https://admin.callflowhq.com/api/"),
            ("CALLFLOW_AUTH_WAIT_MS", "2500"),
            ("CALLFLOW_REQUEST_TIMEOUT_MS", " 10000 "),
        ]))
        .unwrap()
        .validated()
        .unwrap();

        assert_eq!(settings.base_url, "https://admin.callflowhq.com/api");
        assert_eq!(settings.auth_wait_ms, 2500);
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_number() {
        let err = ApiSettings::from_vars(lookup(&[("CALLFLOW_AUTH_WAIT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("CALLFLOW_AUTH_WAIT_MS"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let settings = ApiSettings {
            base_url: "ftp://files.example.com".to_string(),
            ..ApiSettings::default()
        };
        assert!(settings.validated().is_err());

        let settings = ApiSettings {
            base_url: "not a url".to_string(),
            ..ApiSettings::default()
        };
        assert!(settings.validated().is_err());
    }

    #[test]
    fn test_recovery_path_normalized() {
        let settings = ApiSettings {
            recovery_path: "auth/bootstrap".to_string(),
            ..ApiSettings::default()
        }
        .validated()
        .unwrap();
        assert_eq!(settings.recovery_path, "/auth/bootstrap");
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "base_url": "https://staging.example.com/api" }"#).unwrap();

        let settings = ApiSettings::from_file(&path).unwrap();
        assert_eq!(settings.base_url, "https://staging.example.com/api");
        assert_eq!(settings.recovery_path, ApiSettings::DEFAULT_RECOVERY_PATH);
        assert_eq!(settings.request_timeout_ms, 30_000);
    }
}
