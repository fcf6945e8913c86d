//! Request DTOs with validation.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use docvault_core::types::FolderId;

/// Rejects names and titles that are empty once trimmed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("Must not be blank")));
    }
    Ok(())
}

/// `POST /api/folders`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1 to 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
    /// Requested position; appended when absent.
    #[validate(range(min = 0, message = "Position must be zero or greater"))]
    pub position: Option<i32>,
}

/// `PUT /api/folders/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1 to 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    /// New position.
    #[validate(range(min = 0, message = "Position must be zero or greater"))]
    pub position: Option<i32>,
}

/// `PUT /api/folders/reorder`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReorderFolderRequest {
    /// Folder to move.
    pub id: FolderId,
    /// Target zero-based index.
    #[validate(range(min = 0, message = "Position must be zero or greater"))]
    pub position: i32,
}

/// `PUT /api/documents/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// New title.
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1 to 255 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    /// New description; omitted or null clears it.
    #[serde(default)]
    pub description: Option<String>,
}
