//! Organization list and detail screens

use anyhow::{Result, bail};
use log::info;

use super::list::{list_params, render_page, run_list};
use crate::app::AdminApp;
use crate::cli::{ListArgs, Tab};
use crate::components::{Table, error_banner, status_line};
use dashboard::{
    Activity, ListParams, LoadOptions, Organization, Page, ResourceController, SectionLoader,
    SectionPhase, User,
};

fn organizations_table(items: &[Organization]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "STATUS", "PLAN", "USERS"]);
    for org in items {
        table.row(vec![
            org.id.clone(),
            org.name.clone(),
            org.status.clone().unwrap_or_default(),
            org.plan_id.clone().unwrap_or_default(),
            org.user_count.map(|n| n.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

fn users_table(items: &[User]) -> Table {
    let mut table = Table::new(&["ID", "EMAIL", "NAME", "ROLE", "STATUS"]);
    for user in items {
        table.row(vec![
            user.id.clone(),
            user.email.clone(),
            user.name.clone().unwrap_or_default(),
            user.role.clone().unwrap_or_default(),
            user.status.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn activities_table(items: &[Activity]) -> Table {
    let mut table = Table::new(&["WHEN", "ACTION", "ACTOR"]);
    for activity in items {
        table.row(vec![
            activity
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            activity.action.clone(),
            activity.actor.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub async fn show_organizations(app: &AdminApp, args: &ListArgs) -> Result<()> {
    let fetch = app.api.organizations_fetcher(list_params(args));
    run_list(app, "Organizations", fetch, args.watch, &organizations_table).await
}

/// Organization detail: header plus lazily loaded tabs
pub struct OrganizationScreen {
    organization: ResourceController<Organization>,
    users: SectionLoader<Page<User>>,
    activity: SectionLoader<Page<Activity>>,
    id: String,
}

impl OrganizationScreen {
    pub fn new(app: &AdminApp, id: &str) -> Self {
        let users = SectionLoader::new(
            app.controller(format!("organization/{}/users", id)),
            app.api
                .organization_users_fetcher(id, ListParams::default()),
        );
        let activity = SectionLoader::new(
            app.controller(format!("organization/{}/activity", id)),
            app.api
                .organization_activities_fetcher(id, ListParams::default()),
        );
        Self {
            organization: app.controller(format!("organization/{}", id)),
            users,
            activity,
            id: id.to_string(),
        }
    }

    /// Load the header, then only the requested tabs
    pub async fn open(&self, app: &AdminApp, tabs: &[Tab]) {
        self.organization
            .load(app.api.organization_fetcher(&self.id), LoadOptions::default())
            .await;

        for tab in tabs {
            match tab {
                Tab::Users => {
                    self.users.activate().await;
                }
                Tab::Activity => {
                    self.activity.activate().await;
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let state = self.organization.state();
        let mut out = status_line("Organization", &state);
        if let Some(banner) = error_banner(&state) {
            out.push('\n');
            out.push_str(&banner);
        }
        if let Some(org) = &state.value {
            out.push_str(&format!("\n{} ({})", org.name, org.id));
            if let Some(status) = &org.status {
                out.push_str(&format!("\nstatus: {}", status));
            }
            if let Some(plan) = &org.plan_id {
                out.push_str(&format!("\nplan:   {}", plan));
            }
        }

        if self.users.phase() != SectionPhase::Unvisited {
            out.push_str("\n\n");
            out.push_str(&render_page("Users", &self.users.state(), &users_table));
        }
        if self.activity.phase() != SectionPhase::Unvisited {
            out.push_str("\n\n");
            out.push_str(&render_page("Activity", &self.activity.state(), &activities_table));
        }
        out
    }

    pub fn is_missing(&self) -> bool {
        !self.organization.state().has_value()
    }
}

pub async fn show_organization(app: &AdminApp, id: &str, tabs: &[Tab]) -> Result<()> {
    let screen = OrganizationScreen::new(app, id);
    screen.open(app, tabs).await;
    println!("{}", screen.render());
    if screen.is_missing() {
        bail!("Organization {} could not be loaded", id);
    }
    Ok(())
}

pub async fn set_organization_status(app: &AdminApp, id: &str, status: &str) -> Result<()> {
    let org = app.api.update_organization_status(id, status).await?;
    info!("Organization {} status set to {}", org.id, status);
    println!(
        "{} ({}) is now {}",
        org.name,
        org.id,
        org.status.as_deref().unwrap_or(status)
    );
    Ok(())
}
