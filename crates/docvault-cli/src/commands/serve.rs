//! Start the DocVault server.

use clap::Args;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip pending migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if args.no_migrate {
        config.database.auto_migrate = false;
    }

    println!("Starting DocVault server...");
    output::print_kv("Address", &config.server.bind_addr());
    output::print_kv("Database", &config.database.provider);
    output::print_kv("Storage root", &config.storage.root_path);

    docvault_api::run_server(config).await
}
