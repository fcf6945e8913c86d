//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::FolderId;

use crate::document::Document;

/// A top-level folder. Folders form a single ordered list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Zero-based display position. Dense and unique across all folders
    /// once any create, reorder, or delete has committed.
    pub position: i32,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Requested position; `None` appends at the end. Values past the end
    /// are clamped to the end.
    pub position: Option<i32>,
}

/// A folder together with the documents it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDetail {
    /// The folder itself.
    #[serde(flatten)]
    pub folder: Folder,
    /// Documents in this folder, oldest first.
    pub documents: Vec<Document>,
}

impl FolderDetail {
    /// Pair a folder with its documents.
    pub fn new(folder: Folder, documents: Vec<Document>) -> Self {
        Self { folder, documents }
    }
}
