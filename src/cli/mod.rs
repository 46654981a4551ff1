pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgRepository};

#[derive(Parser)]
#[command(name = "ess")]
#[command(about = "ESS CLI - operator tooling for the employee self-service mobile API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the service tables in DATABASE_URL")]
    Init,

    #[command(about = "Mint a bearer token for a login identity")]
    Token {
        #[arg(help = "Login identity (the JWT subject)")]
        user: String,
        #[arg(long, help = "Expiry in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Employee to login mappings")]
    Employee {
        #[command(subcommand)]
        cmd: commands::employee::EmployeeCommands,
    },

    #[command(about = "Office geofence management")]
    Geofence {
        #[command(subcommand)]
        cmd: commands::geofence::GeofenceCommands,
    },

    #[command(about = "Inspect stored daily location records")]
    Location {
        #[command(subcommand)]
        cmd: commands::location::LocationCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

/// Connected repository for commands that touch the database
pub async fn repository(config: &AppConfig) -> anyhow::Result<PgRepository> {
    let database = DatabaseManager::connect(&config.database).await?;
    Ok(PgRepository::new(database.pool().clone()))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Init => {
            let database = DatabaseManager::connect(&config.database).await?;
            database.ensure_schema().await?;
            database.close().await;
            utils::output_success(&output_format, "Database schema is ready", None)
        }
        Commands::Token { user, hours } => commands::token::handle(&config, user, hours, output_format),
        Commands::Employee { cmd } => commands::employee::handle(&config, cmd, output_format).await,
        Commands::Geofence { cmd } => commands::geofence::handle(&config, cmd, output_format).await,
        Commands::Location { cmd } => commands::location::handle(&config, cmd, output_format).await,
    }
}
