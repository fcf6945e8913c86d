//! # docvault-api
//!
//! HTTP API layer for DocVault built on Axum.
//!
//! Provides the REST endpoints for folders and documents, middleware
//! (CORS, security headers, request logging), validating extractors,
//! DTOs, and the mapping from [`docvault_core::AppError`] to responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_state, run_server};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
