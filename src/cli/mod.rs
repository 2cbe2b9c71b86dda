pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

/// Used when neither `--url` nor a saved session names a server
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "leadblocks")]
#[command(about = "LeadBlocks CLI - Command-line client for the leads and companies API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "LEADBLOCKS_URL", help = "API base URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login and save the session token")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(
            long,
            env = "LEADBLOCKS_PASSWORD",
            hide_env_values = true,
            help = "Password (will prompt if not provided)"
        )]
        password: Option<String>,
    },

    #[command(about = "Discard the saved session")]
    Logout,

    #[command(about = "Show the user behind the saved token")]
    Whoami,

    #[command(about = "Check server health")]
    Health,

    #[command(about = "Lead operations")]
    Leads {
        #[command(subcommand)]
        cmd: commands::leads::LeadCommands,
    },

    #[command(about = "Company operations")]
    Companies {
        #[command(subcommand)]
        cmd: commands::companies::CompanyCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Per-invocation settings shared by every command handler
#[derive(Debug, Clone)]
pub struct CliContext {
    pub output: OutputFormat,
    pub url: Option<String>,
}

impl CliContext {
    /// Base URL from `--url`, then the saved session, then the default.
    pub fn base_url(&self, session: Option<&config::Session>) -> String {
        self.url
            .clone()
            .or_else(|| session.map(|s| s.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Client without credentials, for public endpoints
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        let session = config::load_session()?;
        Ok(ApiClient::new(&self.base_url(session.as_ref()))?)
    }

    /// Client carrying the saved session token
    pub fn authed_client(&self) -> anyhow::Result<ApiClient> {
        let session = config::load_session()?
            .ok_or_else(|| anyhow::anyhow!("Not logged in; run `leadblocks login <email>` first"))?;
        let client = ApiClient::new(&self.base_url(Some(&session)))?;
        Ok(client.with_token(session.token))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext {
        output: OutputFormat::from_cli(&cli),
        url: cli.url.clone(),
    };

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password).await,
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Health => commands::auth::health(&ctx).await,
        Commands::Leads { cmd } => commands::leads::handle(cmd, &ctx).await,
        Commands::Companies { cmd } => commands::companies::handle(cmd, &ctx).await,
    }
}
