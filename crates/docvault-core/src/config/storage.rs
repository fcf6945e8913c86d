//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored uploads.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 10 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// MIME types accepted for uploads.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_root_path() -> String {
    "./uploads".to_string()
}

fn default_max_upload() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "application/pdf".to_string(),
    ]
}
