//! DocVault server entry point.
//!
//! Loads configuration, initializes logging, and runs the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use docvault_core::config::{AppConfig, LoggingConfig};
use docvault_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = docvault_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `DOCVAULT_CONFIG` or the `DOCVAULT_ENV` overlay.
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("DOCVAULT_CONFIG") {
        Ok(path) => AppConfig::load_from(&path),
        Err(_) => {
            let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing; `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
