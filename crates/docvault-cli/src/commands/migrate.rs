//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::DatabasePool;
use docvault_database::migration::run_migrations;

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show applied migrations
    Status,
}

/// A row of sqlx's migration bookkeeping table.
#[derive(Debug, sqlx::FromRow)]
struct AppliedMigration {
    version: i64,
    description: String,
    success: bool,
    installed_on: chrono::DateTime<chrono::Utc>,
}

/// Applied migration display row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    /// Version
    version: i64,
    /// Description
    description: String,
    /// Whether it succeeded
    success: bool,
    /// Installed at
    installed_on: String,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if config.database.provider != "postgres" {
        return Err(AppError::configuration(format!(
            "Migrations need the postgres provider, not '{}'",
            config.database.provider
        )));
    }
    let pool = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run { yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Apply pending migrations to the configured database?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    pool.close().await;
                    return Ok(());
                }
            }

            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let applied: Vec<AppliedMigration> = sqlx::query_as(
                "SELECT version, description, success, installed_on \
                 FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(pool.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to read migration status: {e}")))?;

            let rows: Vec<MigrationRow> = applied
                .into_iter()
                .map(|m| MigrationRow {
                    version: m.version,
                    description: m.description,
                    success: m.success,
                    installed_on: m.installed_on.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}
