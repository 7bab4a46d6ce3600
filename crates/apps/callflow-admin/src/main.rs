//! callflow-admin - Terminal front end for the CallFlowHQ admin dashboard
//!
//! Every screen reads from a resource controller; errors are shown as a
//! banner above the last data that loaded successfully.

use anyhow::Result;
use clap::Parser;
use log::{error, info};

mod app;
mod cli;
mod components;
mod views;

use app::AdminApp;
use cli::{Cli, Commands};
use dashboard::{StoredToken, StoredTokenProvider};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Login { token, expires_in } => {
            let stored = StoredTokenProvider::new()?;
            let expires_at = expires_in.map(|secs| chrono::Utc::now().timestamp() + secs);
            stored.save(&StoredToken {
                access_token: token.clone(),
                expires_at,
            })?;
            info!("Token saved to {}", stored.token_path().display());
            return Ok(());
        }
        Commands::Logout => {
            StoredTokenProvider::new()?.logout()?;
            info!("Stored token removed");
            return Ok(());
        }
        _ => {}
    }

    let app = AdminApp::new(cli.api_base.clone())?;
    app.sign_in()?;

    match &cli.command {
        Commands::Orgs(args) => views::show_organizations(&app, args).await,
        Commands::Org { id, tabs } => views::show_organization(&app, id, tabs).await,
        Commands::SetStatus { id, status } => {
            views::set_organization_status(&app, id, status).await
        }
        Commands::Plans(args) => views::show_plans(&app, args).await,
        Commands::PlatformUsers(args) => views::show_platform_users(&app, args).await,
        Commands::Parameters(args) => views::show_parameters(&app, args).await,
        Commands::Tickets(args) => views::show_tickets(&app, args).await,
        Commands::Sessions(args) => views::show_sessions(&app, args).await,
        Commands::Login { .. } | Commands::Logout => Ok(()),
    }
}
