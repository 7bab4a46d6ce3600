//! Application bootstrap: settings, credentials and the API handle

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use dashboard::{
    ApiSettings, AuthContext, DashboardApi, RemoteClient, ResourceController, StaticTokenProvider,
    StoredTokenProvider, SyncValue, UreqTransport,
};

/// Environment variable that supplies a token without touching the token file
const ENV_API_TOKEN: &str = "CALLFLOW_API_TOKEN";

/// Shared handles for every command
pub struct AdminApp {
    pub settings: ApiSettings,
    pub auth: Arc<AuthContext>,
    pub api: DashboardApi,
}

impl AdminApp {
    /// Load settings and build the client; no credentials are registered yet
    pub fn new(api_base: Option<String>) -> Result<Self> {
        let mut settings = ApiSettings::load()?;
        if let Some(base_url) = api_base {
            settings.base_url = base_url;
            settings = settings.validated()?;
        }
        info!("Using API at {}", settings.base_url);

        let auth = Arc::new(AuthContext::new());
        let transport = Arc::new(UreqTransport::new(settings.request_timeout()));
        let client = RemoteClient::new(&settings, auth.clone(), transport);

        Ok(Self {
            settings,
            auth,
            api: DashboardApi::new(client),
        })
    }

    /// Register the token provider (environment token first, then the token file)
    pub fn sign_in(&self) -> Result<()> {
        if let Some(token) = std::env::var(ENV_API_TOKEN).ok().filter(|t| !t.is_empty()) {
            self.auth.register(Arc::new(StaticTokenProvider::new(token)));
            return Ok(());
        }

        let stored = StoredTokenProvider::new()?;
        if !stored.is_authenticated() {
            warn!(
                "No valid API token found. Run `callflow-admin login --token <TOKEN>` \
                 or set {}",
                ENV_API_TOKEN
            );
        }
        self.auth.register(Arc::new(stored));
        Ok(())
    }

    /// Controller for `key` honouring the configured auth wait
    pub fn controller<T: SyncValue>(&self, key: impl Into<String>) -> ResourceController<T> {
        ResourceController::new(key, self.auth.clone()).with_auth_wait(self.settings.auth_wait())
    }
}
