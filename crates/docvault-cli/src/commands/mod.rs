//! CLI command definitions and dispatch.

pub mod document;
pub mod folder;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use docvault_api::AppState;
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

use crate::output::{self, OutputFormat};

/// DocVault: folders of versioned documents
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to config/default.toml plus the
    /// config/{DOCVAULT_ENV}.toml overlay
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the DocVault server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Document inspection
    Document(document::DocumentArgs),
}

impl Cli {
    /// Whether the long-running server was requested.
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::Document(args) => document::execute(args, config, self.format).await,
        }
    }
}

/// Load configuration from an explicit file or the environment overlay.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => {
            let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Open the configured backend and storage and wire the services.
pub async fn open_state(config: AppConfig) -> Result<AppState, AppError> {
    let state = docvault_api::build_state(config).await?;
    if state.database.provider() == "memory" {
        output::print_warning("Using the in-memory database; changes are discarded on exit.");
    }
    Ok(state)
}
