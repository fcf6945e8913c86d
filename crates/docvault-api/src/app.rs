//! Application startup: wires stores, storage, and router, then serves.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;
use docvault_database::DatabaseBackend;
use docvault_storage::LocalStorageProvider;

use crate::router::build_router;
use crate::state::AppState;

/// Open the configured backend and storage root and build the shared state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(provider = %config.database.provider, "Opening database backend");
    let database = DatabaseBackend::connect(&config.database).await?;

    info!(root = %config.storage.root_path, "Opening file storage");
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);

    Ok(AppState::new(config, database, storage))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.bind_addr();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config).await?;
    let database = state.database.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("DocVault listening on {addr}");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    // In-flight requests get `grace` to finish once the signal arrives.
    let served = tokio::select! {
        result = server => result.map_err(|e| AppError::internal(format!("Server error: {e}"))),
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed, dropping connections");
            Ok(())
        }
    };

    database.close().await;
    info!("DocVault shut down");
    served
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
