//! Route definitions for the DocVault HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured file size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.config.storage.max_upload_size_bytes).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(folder_routes())
        .merge(document_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let router = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(
            body_limit.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ));

    middleware::security::with_security_headers(router).with_state(state)
}

/// Liveness and dependency checks.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Folder CRUD and ordering.
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/reorder", put(handlers::folder::reorder_folders))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .put(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
}

/// Documents, versions, and downloads.
fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(handlers::document::create_document))
        .route(
            "/documents/folder/{folder_id}",
            get(handlers::document::list_folder_documents),
        )
        .route(
            "/documents/versions/{version_id}/download",
            get(handlers::document::download_version),
        )
        .route(
            "/documents/{id}",
            get(handlers::document::get_document)
                .put(handlers::document::update_document)
                .delete(handlers::document::delete_document),
        )
        .route(
            "/documents/{id}/versions",
            post(handlers::document::add_version),
        )
        .route(
            "/documents/{id}/download",
            get(handlers::document::download_latest),
        )
}
