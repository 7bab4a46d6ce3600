//! Platform-wide lists: plans, staff, parameters, support and impersonation

use anyhow::Result;

use super::list::{list_params, run_list};
use crate::app::AdminApp;
use crate::cli::ListArgs;
use crate::components::Table;
use dashboard::{ImpersonationSession, Parameter, Plan, PlatformUser, SupportTicket};

fn yes_no(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => String::new(),
    }
}

fn price(cents: Option<i64>) -> String {
    cents
        .map(|c| format!("{}.{:02}", c / 100, (c % 100).abs()))
        .unwrap_or_default()
}

fn plans_table(items: &[Plan]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "PRICE", "PERIOD", "ACTIVE"]);
    for plan in items {
        table.row(vec![
            plan.id.clone(),
            plan.name.clone(),
            price(plan.price_cents),
            plan.billing_period.clone().unwrap_or_default(),
            yes_no(plan.is_active),
        ]);
    }
    table
}

fn platform_users_table(items: &[PlatformUser]) -> Table {
    let mut table = Table::new(&["ID", "EMAIL", "ROLE", "ACTIVE"]);
    for user in items {
        table.row(vec![
            user.id.clone(),
            user.email.clone(),
            user.role.clone().unwrap_or_default(),
            yes_no(user.is_active),
        ]);
    }
    table
}

fn parameters_table(items: &[Parameter]) -> Table {
    let mut table = Table::new(&["KEY", "VALUE", "DESCRIPTION"]);
    for param in items {
        let value = match &param.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.row(vec![
            param.key.clone(),
            value,
            param.description.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn tickets_table(items: &[SupportTicket]) -> Table {
    let mut table = Table::new(&["ID", "SUBJECT", "STATUS", "PRIORITY", "ORG"]);
    for ticket in items {
        table.row(vec![
            ticket.id.clone(),
            ticket.subject.clone(),
            ticket.status.clone().unwrap_or_default(),
            ticket.priority.clone().unwrap_or_default(),
            ticket.organization_id.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn sessions_table(items: &[ImpersonationSession]) -> Table {
    let mut table = Table::new(&["ID", "ADMIN", "TARGET", "STARTED", "ENDED"]);
    for session in items {
        let at = |t: Option<chrono::DateTime<chrono::Utc>>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        };
        table.row(vec![
            session.id.clone(),
            session.admin_id.clone(),
            session.target_user_id.clone(),
            at(session.started_at),
            if session.ended_at.is_none() {
                "active".to_string()
            } else {
                at(session.ended_at)
            },
        ]);
    }
    table
}

pub async fn show_plans(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.plans_fetcher(list_params(args));
    run_list(app, "Plans", fetch, args.watch, &plans_table).await
}

pub async fn show_platform_users(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.platform_users_fetcher(list_params(args));
    run_list(app, "Platform users", fetch, args.watch, &platform_users_table).await
}

pub async fn show_parameters(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.parameters_fetcher(list_params(args));
    run_list(app, "Parameters", fetch, args.watch, &parameters_table).await
}

pub async fn show_tickets(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.support_tickets_fetcher(list_params(args));
    run_list(app, "Support tickets", fetch, args.watch, &tickets_table).await
}

pub async fn show_sessions(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.impersonation_sessions_fetcher(list_params(args));
    run_list(app, "Impersonation sessions", fetch, args.watch, &sessions_table).await
}
