//! Response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// `GET /api/health/detailed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Database provider and reachability.
    pub database: ComponentHealth,
    /// Storage provider and reachability.
    pub storage: ComponentHealth,
    /// Number of folders, when the database answered.
    pub folders: Option<u64>,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Provider name.
    pub provider: String,
    /// Whether it responded.
    pub healthy: bool,
}
