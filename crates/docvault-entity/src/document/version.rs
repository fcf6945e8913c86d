//! File version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{DocumentId, FileVersionId};

/// One immutable uploaded binary belonging to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: FileVersionId,
    /// The document this version belongs to.
    pub document_id: DocumentId,
    /// Storage key of the stored binary.
    pub path: String,
    /// Original filename as uploaded.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// When this version was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// A freshly stored upload waiting for its database record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileVersion {
    /// Storage key the bytes were written to.
    pub path: String,
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type reported for the upload.
    pub mime_type: String,
}
