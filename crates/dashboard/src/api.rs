//! Typed endpoints of the admin backend
//!
//! Thin wrappers over [`RemoteClient`] that build paths from explicit
//! parameter structs and decode the paginated list shape. Each method also
//! has a `*_fetcher` twin usable with a [`ResourceController`].
//!
//! [`ResourceController`]: crate::sync::ResourceController

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::models::{
    Activity, ImpersonationSession, ListParams, Organization, Page, Parameter, Plan, PlatformUser,
    RemoteResult, SupportTicket, User,
};
use crate::remote::RemoteClient;
use crate::sync::{Fetcher, fetcher};

/// Collection names used as paths and as list payload keys
pub mod resources {
    pub const ORGANIZATIONS: &str = "organizations";
    pub const USERS: &str = "users";
    pub const ACTIVITIES: &str = "activities";
    pub const PLANS: &str = "plans";
    pub const PLATFORM_USERS: &str = "platform_users";
    pub const PARAMETERS: &str = "parameters";
    pub const SUPPORT_TICKETS: &str = "tickets";
    pub const IMPERSONATION_SESSIONS: &str = "sessions";
}

/// Typed access to the admin backend
#[derive(Clone)]
pub struct DashboardApi {
    client: RemoteClient,
}

impl DashboardApi {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// GET a paginated collection at `path`, items keyed by `resource_name`
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        resource_name: &str,
        params: &ListParams,
    ) -> RemoteResult<Page<T>> {
        let data: Value = self
            .client
            .get(&format!("{}{}", path, params.to_query()))
            .await?;
        Page::from_data(resource_name, data)
    }

    // === Organizations ===

    pub async fn list_organizations(&self, params: &ListParams) -> RemoteResult<Page<Organization>> {
        self.list_page("/organizations", resources::ORGANIZATIONS, params)
            .await
    }

    pub async fn get_organization(&self, id: &str) -> RemoteResult<Organization> {
        self.client
            .get(&format!("/organizations/{}", urlencoding::encode(id)))
            .await
    }

    /// Change an organization's status (e.g. "active", "suspended")
    pub async fn update_organization_status(
        &self,
        id: &str,
        status: &str,
    ) -> RemoteResult<Organization> {
        self.client
            .put(
                &format!("/organizations/{}", urlencoding::encode(id)),
                json!({ "status": status }),
            )
            .await
    }

    pub async fn list_organization_users(
        &self,
        organization_id: &str,
        params: &ListParams,
    ) -> RemoteResult<Page<User>> {
        let path = format!("/organizations/{}/users", urlencoding::encode(organization_id));
        self.list_page(&path, resources::USERS, params).await
    }

    pub async fn list_organization_activities(
        &self,
        organization_id: &str,
        params: &ListParams,
    ) -> RemoteResult<Page<Activity>> {
        let path = format!(
            "/organizations/{}/activities",
            urlencoding::encode(organization_id)
        );
        self.list_page(&path, resources::ACTIVITIES, params).await
    }

    // === Platform configuration ===

    pub async fn list_plans(&self, params: &ListParams) -> RemoteResult<Page<Plan>> {
        self.list_page("/plans", resources::PLANS, params).await
    }

    pub async fn list_platform_users(&self, params: &ListParams) -> RemoteResult<Page<PlatformUser>> {
        self.list_page("/platform-users", resources::PLATFORM_USERS, params)
            .await
    }

    pub async fn list_parameters(&self, params: &ListParams) -> RemoteResult<Page<Parameter>> {
        self.list_page("/parameters", resources::PARAMETERS, params)
            .await
    }

    pub async fn list_support_tickets(&self, params: &ListParams) -> RemoteResult<Page<SupportTicket>> {
        self.list_page("/support/tickets", resources::SUPPORT_TICKETS, params)
            .await
    }

    pub async fn list_impersonation_sessions(
        &self,
        params: &ListParams,
    ) -> RemoteResult<Page<ImpersonationSession>> {
        self.list_page(
            "/impersonation/sessions",
            resources::IMPERSONATION_SESSIONS,
            params,
        )
        .await
    }

    // === Fetchers for controllers ===

    pub fn organizations_fetcher(&self, params: ListParams) -> Fetcher<Page<Organization>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_organizations(&params).await }
        })
    }

    pub fn organization_fetcher(&self, id: &str) -> Fetcher<Organization> {
        let api = self.clone();
        let id = id.to_string();
        fetcher(move || {
            let api = api.clone();
            let id = id.clone();
            async move { api.get_organization(&id).await }
        })
    }

    pub fn organization_users_fetcher(
        &self,
        organization_id: &str,
        params: ListParams,
    ) -> Fetcher<Page<User>> {
        let api = self.clone();
        let organization_id = organization_id.to_string();
        fetcher(move || {
            let api = api.clone();
            let organization_id = organization_id.clone();
            let params = params.clone();
            async move { api.list_organization_users(&organization_id, &params).await }
        })
    }

    pub fn organization_activities_fetcher(
        &self,
        organization_id: &str,
        params: ListParams,
    ) -> Fetcher<Page<Activity>> {
        let api = self.clone();
        let organization_id = organization_id.to_string();
        fetcher(move || {
            let api = api.clone();
            let organization_id = organization_id.clone();
            let params = params.clone();
            async move {
                api.list_organization_activities(&organization_id, &params)
                    .await
            }
        })
    }

    pub fn plans_fetcher(&self, params: ListParams) -> Fetcher<Page<Plan>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_plans(&params).await }
        })
    }

    pub fn platform_users_fetcher(&self, params: ListParams) -> Fetcher<Page<PlatformUser>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_platform_users(&params).await }
        })
    }

    pub fn parameters_fetcher(&self, params: ListParams) -> Fetcher<Page<Parameter>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_parameters(&params).await }
        })
    }

    pub fn support_tickets_fetcher(&self, params: ListParams) -> Fetcher<Page<SupportTicket>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_support_tickets(&params).await }
        })
    }

    pub fn impersonation_sessions_fetcher(
        &self,
        params: ListParams,
    ) -> Fetcher<Page<ImpersonationSession>> {
        let api = self.clone();
        fetcher(move || {
            let api = api.clone();
            let params = params.clone();
            async move { api.list_impersonation_sessions(&params).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthContext, StaticTokenProvider};
    use crate::models::ErrorKind;
    use crate::remote::{Method, ScriptedTransport};
    use std::sync::Arc;

    fn make_api(transport: Arc<ScriptedTransport>) -> DashboardApi {
        let auth = Arc::new(AuthContext::with_provider(Arc::new(StaticTokenProvider::new("tok"))));
        DashboardApi::new(RemoteClient::with_base_url(
            "https://api.example.com/api",
            auth,
            transport,
        ))
    }

    #[tokio::test]
    async fn test_list_organizations_builds_query() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(json!({
            "organizations": [{"id": "org_1", "name": "Acme"}],
            "pagination": {"page": 2, "limit": 10, "total": 11, "total_pages": 2,
                           "has_next": false, "has_prev": true}
        }));
        let api = make_api(transport.clone());

        let params = ListParams::default().page(2).limit(10).search("acme");
        let page = api.list_organizations(&params).await.unwrap();

        assert_eq!(page.items[0].id, "org_1");
        assert!(page.pagination.has_prev);
        assert_eq!(
            transport.requests()[0].url,
            "https://api.example.com/api/organizations?page=2&limit=10&search=acme"
        );
    }

    #[tokio::test]
    async fn test_update_status_sends_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(json!({"id": "org 1", "name": "Acme", "status": "suspended"}));
        let api = make_api(transport.clone());

        let org = api
            .update_organization_status("org 1", "suspended")
            .await
            .unwrap();
        assert_eq!(org.status.as_deref(), Some("suspended"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Put);
        assert!(request.url.ends_with("/organizations/org%201"));
        assert_eq!(request.body.as_deref(), Some(r#"{"status":"suspended"}"#));
    }

    #[tokio::test]
    async fn test_wrong_payload_shape_is_api_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(json!({"plans": [{"unexpected": true}]}));
        let api = make_api(transport);

        let err = api.list_plans(&ListParams::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
    }

    #[tokio::test]
    async fn test_renamed_collection_key_is_api_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_ok(json!({"items": [{"id": "p1", "name": "Starter"}]}));
        let api = make_api(transport);

        let err = api.list_plans(&ListParams::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert!(err.message.contains("missing 'plans'"));
    }

    #[tokio::test]
    async fn test_fetcher_calls_endpoint_each_time() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push_ok(json!({"tickets": []}))
            .push_ok(json!({"tickets": [{"id": "t1", "subject": "Dialer down"}]}));
        let api = make_api(transport.clone());

        let fetch = api.support_tickets_fetcher(ListParams::default().status("open"));
        assert!(fetch().await.unwrap().items.is_empty());
        assert_eq!(fetch().await.unwrap().items[0].subject, "Dialer down");
        assert_eq!(transport.request_count(), 2);
        assert!(transport.requests()[1].url.contains("status=open"));
    }
}
