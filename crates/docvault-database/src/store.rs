//! Store traits implemented by every persistence backend.
//!
//! Services depend only on these traits, so the PostgreSQL repositories
//! and the in-memory store are interchangeable.

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FileVersionId, FolderId};
use docvault_entity::document::{
    CreateDocument, Document, DocumentDetail, FileVersion, NewFileVersion, UpdateDocument,
};
use docvault_entity::folder::{CreateFolder, Folder, PositionUpdate};

/// Persistence for the ordered folder list.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// All folders ascending by position, ties broken by creation time.
    async fn list_ordered(&self) -> AppResult<Vec<Folder>>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Insert a folder at `data.position` clamped to `[0, N]`, appending
    /// when absent. Folders at or after that position shift down by one
    /// in the same transaction.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename folder `id` and/or apply position updates in one transaction.
    ///
    /// Fails with NotFound, writing nothing, when `id` or any updated
    /// folder does not exist.
    async fn update(
        &self,
        id: FolderId,
        name: Option<&str>,
        positions: &[PositionUpdate],
    ) -> AppResult<Folder>;

    /// Write every update or none of them.
    ///
    /// Fails with NotFound, leaving all positions untouched, when any
    /// referenced folder does not exist.
    async fn apply_positions(&self, updates: &[PositionUpdate]) -> AppResult<()>;

    /// Delete a folder with its documents and versions, then close the gap
    /// it leaves in the ordering. Returns `false` when it did not exist.
    async fn delete(&self, id: FolderId) -> AppResult<bool>;

    /// Number of folders.
    async fn count(&self) -> AppResult<u64>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Persistence for documents and their file versions.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Every document, oldest first.
    async fn list_all(&self) -> AppResult<Vec<Document>>;

    /// Documents in a folder with their versions, oldest document first.
    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<DocumentDetail>>;

    /// A single document with its versions.
    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<DocumentDetail>>;

    /// Insert a document and its first version atomically.
    async fn create(
        &self,
        data: &CreateDocument,
        version: &NewFileVersion,
    ) -> AppResult<DocumentDetail>;

    /// Replace title and description. `None` when the document is absent.
    async fn update(
        &self,
        id: DocumentId,
        data: &UpdateDocument,
    ) -> AppResult<Option<DocumentDetail>>;

    /// Delete a document and its versions. Returns `false` when absent.
    async fn delete(&self, id: DocumentId) -> AppResult<bool>;

    /// Append a version and refresh the document's MIME type.
    async fn create_version(
        &self,
        document_id: DocumentId,
        version: &NewFileVersion,
    ) -> AppResult<FileVersion>;

    /// Find a version by ID.
    async fn find_version(&self, id: FileVersionId) -> AppResult<Option<FileVersion>>;

    /// The most recently uploaded version of a document.
    async fn latest_version(&self, document_id: DocumentId) -> AppResult<Option<FileVersion>>;

    /// Every version of every document in a folder.
    async fn versions_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<FileVersion>>;
}
