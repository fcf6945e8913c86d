//! Upload acceptance rules.

use bytes::Bytes;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as sent by the client.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl UploadedFile {
    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Content type without parameters, lowercased.
    pub fn essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

/// Size and media type limits applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_size_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl UploadPolicy {
    /// Create a policy.
    pub fn new(max_size_bytes: u64, allowed_mime_types: Vec<String>) -> Self {
        Self {
            max_size_bytes,
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Build the policy from storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            config.max_upload_size_bytes,
            config.allowed_mime_types.clone(),
        )
    }

    /// Maximum accepted size in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Accepted MIME types.
    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }

    /// Reject files that are unnamed, too large, or of a disallowed type.
    pub fn check(&self, file: &UploadedFile) -> AppResult<()> {
        if file.file_name.trim().is_empty() {
            return Err(AppError::validation("Uploaded file has no name"));
        }

        if file.size() > self.max_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "File exceeds the {} byte upload limit",
                self.max_size_bytes
            ))
            .with_details(serde_json::json!({
                "size": file.size(),
                "limit": self.max_size_bytes,
            })));
        }

        let essence = file.essence();
        if !self.allowed_mime_types.iter().any(|m| *m == essence) {
            return Err(AppError::unsupported_media_type(format!(
                "File type '{essence}' is not allowed"
            ))
            .with_details(serde_json::json!({
                "allowed": self.allowed_mime_types,
            })));
        }

        Ok(())
    }
}
