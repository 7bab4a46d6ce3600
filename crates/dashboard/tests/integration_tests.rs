//! Integration tests for the dashboard crate
//!
//! These tests drive controllers and sections through the real remote
//! client against a scripted backend.

use dashboard::{
    AuthContext, DashboardApi, ErrorKind, ListParams, LoadOptions, LoadOutcome, RemoteClient,
    ResourceController, ResourceStatus, ScriptedTransport, SectionLoader, SectionPhase,
    StaticTokenProvider,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Helper to build an API over a scripted transport
fn make_api(transport: &Arc<ScriptedTransport>, auth: &Arc<AuthContext>) -> DashboardApi {
    DashboardApi::new(RemoteClient::with_base_url(
        "https://admin.callflowhq.test/api",
        auth.clone(),
        transport.clone(),
    ))
}

fn ready_auth() -> Arc<AuthContext> {
    Arc::new(AuthContext::with_provider(Arc::new(StaticTokenProvider::new("tok"))))
}

fn users_page(ids: &[&str]) -> serde_json::Value {
    let users: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "email": format!("{}@acme.test", id)}))
        .collect();
    json!({
        "users": users,
        "pagination": {"page": 1, "limit": 20, "total": ids.len(), "total_pages": 1,
                       "has_next": false, "has_prev": false}
    })
}

#[tokio::test]
async fn test_organization_detail_loads() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(json!({"id": "org_1", "name": "Acme"}));
    let auth = ready_auth();
    let api = make_api(&transport, &auth);

    let organization = ResourceController::new("organization/org_1", auth.clone());
    let outcome = organization
        .load(api.organization_fetcher("org_1"), LoadOptions::default())
        .await;

    assert_eq!(outcome, LoadOutcome::Completed(ResourceStatus::Ready));
    let state = organization.state();
    assert_eq!(state.status, ResourceStatus::Ready);
    let org = state.value.unwrap();
    assert_eq!(org.id, "org_1");
    assert_eq!(org.name, "Acme");
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn test_network_failure_keeps_users() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .push_ok(users_page(&["u1", "u2"]))
        .push_transport_error("network down");
    let auth = ready_auth();
    let api = make_api(&transport, &auth);

    let users = ResourceController::new("org_1/users", auth.clone());
    let fetch = api.organization_users_fetcher("org_1", ListParams::default());

    users.load(fetch.clone(), LoadOptions::immediate()).await;
    users.load(fetch, LoadOptions::immediate()).await;

    let state = users.state();
    assert_eq!(state.status, ResourceStatus::Error);
    let ids: Vec<_> = state.value.unwrap().items.into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec!["u1", "u2"]);
    let error = state.last_error.unwrap();
    assert_eq!(error.kind, ErrorKind::Transport);
    assert!(error.message.contains("network down"));
}

#[tokio::test]
async fn test_transient_empty_page_is_ignored() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .push_ok(users_page(&["u1"]))
        .push_ok(users_page(&[]))
        .push_ok(users_page(&[]));
    let auth = ready_auth();
    let api = make_api(&transport, &auth);

    let users = ResourceController::new("org_1/users", auth.clone());
    let fetch = api.organization_users_fetcher("org_1", ListParams::default());

    users.load(fetch.clone(), LoadOptions::immediate()).await;
    users.load(fetch.clone(), LoadOptions::immediate()).await;
    assert_eq!(users.state().value.unwrap().items.len(), 1);
    assert_eq!(users.state().status, ResourceStatus::Ready);

    // After a delete the caller accepts an empty list
    users
        .load(fetch, LoadOptions::immediate().accept_empty(true))
        .await;
    assert!(users.state().value.unwrap().items.is_empty());
}

#[tokio::test]
async fn test_auth_recovery_through_controller() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .push_response(401, r#"{"success":false,"error":"user not provisioned"}"#)
        .push_ok(json!({"created": true}))
        .push_ok(json!({"plans": [{"id": "p1", "name": "Starter"}]}));
    let auth = ready_auth();
    let api = make_api(&transport, &auth);

    let plans = ResourceController::new("plans", auth.clone());
    plans
        .load(api.plans_fetcher(ListParams::default()), LoadOptions::default())
        .await;

    assert_eq!(transport.request_count(), 3);
    let state = plans.state();
    assert_eq!(state.status, ResourceStatus::Ready);
    assert_eq!(state.value.unwrap().items[0].name, "Starter");
}

#[tokio::test(start_paused = true)]
async fn test_load_waits_for_late_provider() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(json!({"tickets": [{"id": "t1", "subject": "No audio"}]}));
    let auth = Arc::new(AuthContext::new());
    let api = make_api(&transport, &auth);

    let late = auth.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        late.register(Arc::new(StaticTokenProvider::new("tok")));
    });

    let tickets = ResourceController::new("tickets", auth.clone());
    tickets
        .load(api.support_tickets_fetcher(ListParams::default()), LoadOptions::default())
        .await;

    assert_eq!(tickets.state().status, ResourceStatus::Ready);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_provider_times_out_without_requests() {
    let transport = Arc::new(ScriptedTransport::new());
    let auth = Arc::new(AuthContext::new());
    let api = make_api(&transport, &auth);

    let orgs = ResourceController::new("organizations", auth.clone())
        .with_auth_wait(Duration::from_millis(500));
    orgs.load(api.organizations_fetcher(ListParams::default()), LoadOptions::default())
        .await;

    let state = orgs.state();
    assert_eq!(state.status, ResourceStatus::Error);
    assert_eq!(state.last_error.unwrap().kind, ErrorKind::AuthTimeout);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_tabs_load_on_demand() {
    let transport = Arc::new(ScriptedTransport::new());
    let auth = ready_auth();
    let api = make_api(&transport, &auth);

    let users = SectionLoader::new(
        ResourceController::new("org_1/users", auth.clone()),
        api.organization_users_fetcher("org_1", ListParams::default()),
    );
    let activity = SectionLoader::new(
        ResourceController::new("org_1/activity", auth.clone()),
        api.organization_activities_fetcher("org_1", ListParams::default()),
    );

    assert_eq!(users.phase(), SectionPhase::Unvisited);
    assert_eq!(activity.phase(), SectionPhase::Unvisited);

    // Only the users tab is opened
    transport.push_ok(users_page(&["u1"]));
    users.activate().await;
    users.activate().await;

    assert_eq!(transport.request_count(), 1);
    assert_eq!(users.phase(), SectionPhase::Settled(ResourceStatus::Ready));
    assert_eq!(activity.phase(), SectionPhase::Unvisited);

    // Activity tab fails, then the user retries
    transport
        .push_response(500, "")
        .push_ok(json!({"activities": [{"id": "a1", "action": "plan_changed"}]}));
    activity.activate().await;
    assert_eq!(activity.phase(), SectionPhase::Settled(ResourceStatus::Error));
    assert_eq!(
        activity.state().last_error.unwrap().kind,
        ErrorKind::HttpError { status: 500 }
    );

    activity.retry().await;
    assert_eq!(activity.phase(), SectionPhase::Settled(ResourceStatus::Ready));
    assert_eq!(activity.state().value.unwrap().items[0].action, "plan_changed");
    assert_eq!(transport.request_count(), 3);
}
