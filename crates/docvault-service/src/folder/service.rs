//! Folder lifecycle: listing, creation, renaming, reordering, deletion.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::StorageProvider;
use docvault_core::types::FolderId;
use docvault_database::store::{DocumentStore, FolderStore};
use docvault_entity::document::Document;
use docvault_entity::folder::{CreateFolder, Folder, FolderDetail};

use super::reorder::plan_reorder;
use crate::cleanup::{CleanupReport, remove_stored_files};
use crate::naming::normalize_name;

/// Partial folder update. At least one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New zero-based index in the folder order.
    pub position: Option<i32>,
}

/// Manages folders and their ordering.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn StorageProvider>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            folders,
            documents,
            storage,
        }
    }

    /// All folders in display order, each with its documents.
    pub async fn list_folders(&self) -> AppResult<Vec<FolderDetail>> {
        let folders = self.folders.list_ordered().await?;

        let mut by_folder: HashMap<FolderId, Vec<Document>> = HashMap::new();
        for document in self.documents.list_all().await? {
            by_folder.entry(document.folder_id).or_default().push(document);
        }

        Ok(folders
            .into_iter()
            .map(|folder| {
                let documents = by_folder.remove(&folder.id).unwrap_or_default();
                FolderDetail::new(folder, documents)
            })
            .collect())
    }

    /// A single folder with its documents.
    pub async fn get_folder(&self, id: FolderId) -> AppResult<FolderDetail> {
        let folder = self.require(id).await?;
        let documents = self
            .documents
            .find_by_folder(id)
            .await?
            .into_iter()
            .map(|detail| detail.document)
            .collect();
        Ok(FolderDetail::new(folder, documents))
    }

    /// Create a folder at `position`, or at the end when `None`.
    ///
    /// The name is trimmed and must not be blank.
    pub async fn create_folder(&self, name: &str, position: Option<i32>) -> AppResult<FolderDetail> {
        let name = normalize_name("name", name)?;
        let folder = self
            .folders
            .create(&CreateFolder { name, position })
            .await?;

        info!(folder_id = %folder.id, position = folder.position, "Folder created");
        Ok(FolderDetail::new(folder, Vec::new()))
    }

    /// Rename and/or move a folder.
    ///
    /// The move is planned before anything is written, and the rename and
    /// position writes commit together, so a failure leaves both untouched.
    pub async fn update_folder(
        &self,
        id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<FolderDetail> {
        if req.name.is_none() && req.position.is_none() {
            return Err(AppError::validation(
                "At least one of name or position must be provided",
            ));
        }
        let name = req
            .name
            .as_deref()
            .map(|n| normalize_name("name", n))
            .transpose()?;
        self.require(id).await?;

        let updates = match req.position {
            Some(target) => {
                let folders = self.folders.list_ordered().await?;
                plan_reorder(&folders, id, target)?.updates
            }
            None => Vec::new(),
        };

        self.folders.update(id, name.as_deref(), &updates).await?;
        info!(
            folder_id = %id,
            renamed = name.is_some(),
            moved = updates.len(),
            "Folder updated"
        );

        self.get_folder(id).await
    }

    /// Move a folder to `target_index` and return the new order.
    pub async fn reorder(&self, id: FolderId, target_index: i32) -> AppResult<Vec<Folder>> {
        let folders = self.folders.list_ordered().await?;
        let plan = plan_reorder(&folders, id, target_index)?;

        if plan.is_noop() {
            return Ok(folders);
        }

        self.folders.apply_positions(&plan.updates).await?;
        info!(
            folder_id = %id,
            position = target_index,
            updated = plan.updates.len(),
            "Folders reordered"
        );

        self.folders.list_ordered().await
    }

    /// Delete a folder, its documents, and their versions, then remove the
    /// stored files.
    pub async fn delete_folder(&self, id: FolderId) -> AppResult<CleanupReport> {
        self.require(id).await?;
        let versions = self.documents.versions_in_folder(id).await?;

        if !self.folders.delete(id).await? {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        }

        let report = remove_stored_files(self.storage.as_ref(), &versions).await;
        info!(
            folder_id = %id,
            files = report.attempted,
            failed = report.failed.len(),
            "Folder deleted"
        );
        Ok(report)
    }

    async fn require(&self, id: FolderId) -> AppResult<Folder> {
        self.folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }
}
