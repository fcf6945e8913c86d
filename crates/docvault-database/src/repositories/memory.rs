//! Process-local store for tests, demos, and the `memory` provider.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FileVersionId, FolderId};
use docvault_entity::document::{
    CreateDocument, Document, DocumentDetail, FileVersion, NewFileVersion, UpdateDocument,
};
use docvault_entity::folder::{CreateFolder, Folder, PositionUpdate};

use super::attach_versions;
use crate::store::{DocumentStore, FolderStore};

#[derive(Debug, Default)]
struct MemoryState {
    folders: HashMap<FolderId, Folder>,
    documents: HashMap<DocumentId, Document>,
    versions: HashMap<FileVersionId, FileVersion>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Strictly increasing clock so version ordering never ties.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }

    fn ordered_folders(&self) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self.folders.values().cloned().collect();
        folders.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
        });
        folders
    }

    fn documents_sorted<F>(&self, filter: F) -> Vec<Document>
    where
        F: Fn(&Document) -> bool,
    {
        let mut documents: Vec<Document> =
            self.documents.values().filter(|d| filter(d)).cloned().collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        documents
    }

    fn versions_where<F>(&self, filter: F) -> Vec<FileVersion>
    where
        F: Fn(&FileVersion) -> bool,
    {
        let mut versions: Vec<FileVersion> =
            self.versions.values().filter(|v| filter(v)).cloned().collect();
        versions.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        versions
    }

    fn detail(&self, id: DocumentId) -> Option<DocumentDetail> {
        let document = self.documents.get(&id)?.clone();
        let versions = self.versions_where(|v| v.document_id == id);
        Some(DocumentDetail::new(document, versions))
    }

    fn insert_version(&mut self, document_id: DocumentId, data: &NewFileVersion) -> FileVersion {
        let version = FileVersion {
            id: FileVersionId::new(),
            document_id,
            path: data.path.clone(),
            name: data.name.clone(),
            size: data.size,
            uploaded_at: self.tick(),
        };
        self.versions.insert(version.id, version.clone());
        version
    }
}

/// In-memory implementation of both store traits.
///
/// Every operation runs under a single lock, so each one is atomic with
/// respect to the others.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn list_ordered(&self) -> AppResult<Vec<Folder>> {
        Ok(self.state.read().await.ordered_folders())
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let len = i32::try_from(state.folders.len())
            .map_err(|_| AppError::internal("Folder count exceeds position range"))?;
        let position = data.position.map_or(len, |p| p.clamp(0, len));
        let now = state.tick();

        for folder in state.folders.values_mut() {
            if folder.position >= position {
                folder.position += 1;
                folder.updated_at = now;
            }
        }

        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            position,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update(
        &self,
        id: FolderId,
        name: Option<&str>,
        positions: &[PositionUpdate],
    ) -> AppResult<Folder> {
        let mut state = self.state.write().await;

        let missing = std::iter::once(id)
            .chain(positions.iter().map(|u| u.folder_id))
            .find(|folder_id| !state.folders.contains_key(folder_id));
        if let Some(missing) = missing {
            return Err(AppError::not_found(format!("Folder {missing} not found")));
        }

        let now = state.tick();
        for update in positions {
            if let Some(folder) = state.folders.get_mut(&update.folder_id) {
                folder.position = update.position;
                folder.updated_at = now;
            }
        }

        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        if let Some(name) = name {
            folder.name = name.to_string();
            folder.updated_at = now;
        }
        Ok(folder.clone())
    }

    async fn apply_positions(&self, updates: &[PositionUpdate]) -> AppResult<()> {
        let mut state = self.state.write().await;

        if let Some(missing) = updates
            .iter()
            .find(|u| !state.folders.contains_key(&u.folder_id))
        {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                missing.folder_id
            )));
        }

        let now = state.tick();
        for update in updates {
            if let Some(folder) = state.folders.get_mut(&update.folder_id) {
                folder.position = update.position;
                folder.updated_at = now;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(removed) = state.folders.remove(&id) else {
            return Ok(false);
        };

        let document_ids: HashSet<DocumentId> = state
            .documents
            .values()
            .filter(|d| d.folder_id == id)
            .map(|d| d.id)
            .collect();
        state.documents.retain(|doc_id, _| !document_ids.contains(doc_id));
        state
            .versions
            .retain(|_, v| !document_ids.contains(&v.document_id));

        let now = state.tick();
        for folder in state.folders.values_mut() {
            if folder.position > removed.position {
                folder.position -= 1;
                folder.updated_at = now;
            }
        }
        Ok(true)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.state.read().await.folders.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_all(&self) -> AppResult<Vec<Document>> {
        Ok(self.state.read().await.documents_sorted(|_| true))
    }

    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<DocumentDetail>> {
        let state = self.state.read().await;
        let documents = state.documents_sorted(|d| d.folder_id == folder_id);
        let ids: HashSet<DocumentId> = documents.iter().map(|d| d.id).collect();
        let versions = state.versions_where(|v| ids.contains(&v.document_id));
        Ok(attach_versions(documents, versions))
    }

    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<DocumentDetail>> {
        Ok(self.state.read().await.detail(id))
    }

    async fn create(
        &self,
        data: &CreateDocument,
        version: &NewFileVersion,
    ) -> AppResult<DocumentDetail> {
        let mut state = self.state.write().await;
        if !state.folders.contains_key(&data.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                data.folder_id
            )));
        }

        let now = state.tick();
        let document = Document {
            id: DocumentId::new(),
            folder_id: data.folder_id,
            title: data.title.clone(),
            description: data.description.clone(),
            mime_type: version.mime_type.clone(),
            created_at: now,
            updated_at: now,
        };
        state.documents.insert(document.id, document.clone());
        let first = state.insert_version(document.id, version);

        Ok(DocumentDetail::new(document, vec![first]))
    }

    async fn update(
        &self,
        id: DocumentId,
        data: &UpdateDocument,
    ) -> AppResult<Option<DocumentDetail>> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let Some(document) = state.documents.get_mut(&id) else {
            return Ok(None);
        };
        document.title = data.title.clone();
        document.description = data.description.clone();
        document.updated_at = now;
        Ok(state.detail(id))
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.documents.remove(&id).is_none() {
            return Ok(false);
        }
        state.versions.retain(|_, v| v.document_id != id);
        Ok(true)
    }

    async fn create_version(
        &self,
        document_id: DocumentId,
        version: &NewFileVersion,
    ) -> AppResult<FileVersion> {
        let mut state = self.state.write().await;
        let now = state.tick();
        let document = state
            .documents
            .get_mut(&document_id)
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))?;
        document.mime_type = version.mime_type.clone();
        document.updated_at = now;
        Ok(state.insert_version(document_id, version))
    }

    async fn find_version(&self, id: FileVersionId) -> AppResult<Option<FileVersion>> {
        Ok(self.state.read().await.versions.get(&id).cloned())
    }

    async fn latest_version(&self, document_id: DocumentId) -> AppResult<Option<FileVersion>> {
        let state = self.state.read().await;
        Ok(state
            .versions_where(|v| v.document_id == document_id)
            .into_iter()
            .next())
    }

    async fn versions_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<FileVersion>> {
        let state = self.state.read().await;
        let ids: HashSet<DocumentId> = state
            .documents
            .values()
            .filter(|d| d.folder_id == folder_id)
            .map(|d| d.id)
            .collect();
        Ok(state.versions_where(|v| ids.contains(&v.document_id)))
    }
}
