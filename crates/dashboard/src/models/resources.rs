//! Payload shapes returned by the admin backend
//!
//! Only the fields the dashboard renders are modelled; everything else in a
//! backend record is ignored on decode.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteResult, SyncValue};

/// Filters accepted by the paginated list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            status: None,
        }
    }
}

impl ListParams {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, 100);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Render as a query string (`?page=1&limit=20...`)
    pub fn to_query(&self) -> String {
        let mut query = format!("?page={}&limit={}", self.page, self.limit);
        if let Some(search) = &self.search {
            query.push_str(&format!("&search={}", urlencoding::encode(search)));
        }
        if let Some(status) = &self.status {
            query.push_str(&format!("&status={}", urlencoding::encode(status)));
        }
        query
    }
}

/// Pagination block attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode `{ "<resource_name>": [...], "pagination": {...} }`.
    ///
    /// A missing pagination block is synthesized from the item count.
    pub fn from_data(resource_name: &str, data: serde_json::Value) -> RemoteResult<Self> {
        let serde_json::Value::Object(mut map) = data else {
            return Err(RemoteError::api(format!(
                "Malformed response: expected an object holding '{}'",
                resource_name
            )));
        };

        // A missing collection key is a shape mismatch, not an empty page
        let raw = map.remove(resource_name).ok_or_else(|| {
            RemoteError::api(format!("Malformed response: missing '{}'", resource_name))
        })?;
        let items: Vec<T> = serde_json::from_value(raw).map_err(|e| {
            RemoteError::api(format!("Malformed response for '{}': {}", resource_name, e))
        })?;

        let pagination = match map.remove("pagination") {
            Some(raw) => serde_json::from_value(raw)
                .map_err(|e| RemoteError::api(format!("Malformed pagination: {}", e)))?,
            None => Pagination {
                page: 1,
                limit: items.len() as u32,
                total: items.len() as u64,
                total_pages: 1,
                has_next: false,
                has_prev: false,
            },
        };

        Ok(Self { items, pagination })
    }
}

impl<T: Clone + Send + Sync + 'static> SyncValue for Page<T> {
    fn looks_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A customer organization (tenant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub user_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user belonging to an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A platform (staff) user of the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A subscription plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub billing_period: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// An entry of an organization's activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A system parameter (key/value configuration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
}

/// A support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recorded impersonation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpersonationSession {
    pub id: String,
    pub admin_id: String,
    pub target_user_id: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl SyncValue for Organization {}
impl SyncValue for User {}
impl SyncValue for PlatformUser {}
impl SyncValue for Plan {}
impl SyncValue for Activity {}
impl SyncValue for Parameter {}
impl SyncValue for SupportTicket {}
impl SyncValue for ImpersonationSession {}
