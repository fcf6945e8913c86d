//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{DocumentId, FolderId};

use super::version::FileVersion;

/// A titled document living in exactly one folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The folder containing this document.
    pub folder_id: FolderId,
    /// Document title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// MIME type of the most recently uploaded version.
    pub mime_type: String,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// The folder to place the document in.
    pub folder_id: FolderId,
    /// Document title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Editable document fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDocument {
    /// New title.
    pub title: String,
    /// New description; `None` clears it.
    pub description: Option<String>,
}

/// A document with its version history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    /// The document itself.
    #[serde(flatten)]
    pub document: Document,
    /// Uploaded versions ordered by upload time descending.
    pub versions: Vec<FileVersion>,
}

impl DocumentDetail {
    /// Pair a document with its versions, sorting them newest first.
    pub fn new(document: Document, mut versions: Vec<FileVersion>) -> Self {
        versions.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Self { document, versions }
    }

    /// The most recently uploaded version, if any.
    pub fn latest_version(&self) -> Option<&FileVersion> {
        self.versions.first()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use docvault_core::types::FileVersionId;

    use super::*;

    fn version(document_id: DocumentId, name: &str, age_minutes: i64) -> FileVersion {
        FileVersion {
            id: FileVersionId::new(),
            document_id,
            path: format!("{name}.pdf"),
            name: name.to_string(),
            size: 10,
            uploaded_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_versions_sorted_newest_first() {
        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(),
            folder_id: FolderId::new(),
            title: "Contract".into(),
            description: None,
            mime_type: "application/pdf".into(),
            created_at: now,
            updated_at: now,
        };
        let id = document.id;
        let detail = DocumentDetail::new(
            document,
            vec![version(id, "v1", 30), version(id, "v3", 1), version(id, "v2", 10)],
        );

        let names: Vec<_> = detail.versions.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["v3", "v2", "v1"]);
        assert_eq!(detail.latest_version().map(|v| v.name.as_str()), Some("v3"));
    }

    #[test]
    fn test_detail_serializes_flat_camel_case() {
        let now = Utc::now();
        let detail = DocumentDetail::new(
            Document {
                id: DocumentId::new(),
                folder_id: FolderId::new(),
                title: "Scan".into(),
                description: Some("front page".into()),
                mime_type: "image/png".into(),
                created_at: now,
                updated_at: now,
            },
            Vec::new(),
        );

        let json = serde_json::to_value(&detail).expect("serialize");
        assert!(json.get("folderId").is_some());
        assert!(json.get("mimeType").is_some());
        assert_eq!(json["versions"], serde_json::json!([]));
        assert!(json.get("document").is_none());
    }
}
