use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "callflow-admin", version, about = "CallFlowHQ admin dashboard (terminal)")]
pub struct Cli {
    /// Override the API base URL for this run
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filters shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    /// Status filter
    #[arg(long)]
    pub status: Option<String>,
    /// Keep running and refresh every N seconds
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    Users,
    Activity,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store an API token in the config directory.
    Login {
        /// Bearer token issued by the identity provider
        #[arg(long)]
        token: String,
        /// Seconds until the token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Remove the stored API token.
    Logout,
    /// List organizations.
    Orgs(ListArgs),
    /// Show one organization with optional tabs.
    Org {
        /// Organization id
        id: String,
        /// Tabs to open (repeatable)
        #[arg(long = "tab", value_enum)]
        tabs: Vec<Tab>,
    },
    /// Change an organization's status.
    SetStatus {
        /// Organization id
        id: String,
        /// New status, e.g. active or suspended
        status: String,
    },
    /// List subscription plans.
    Plans(ListArgs),
    /// List platform users.
    PlatformUsers(ListArgs),
    /// List system parameters.
    Parameters(ListArgs),
    /// List support tickets.
    Tickets(ListArgs),
    /// List impersonation sessions.
    Sessions(ListArgs),
}
