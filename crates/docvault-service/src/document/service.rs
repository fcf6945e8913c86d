//! Document CRUD, version uploads, and downloads.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{ByteStream, StorageProvider};
use docvault_core::types::{DocumentId, FileVersionId, FolderId};
use docvault_database::store::{DocumentStore, FolderStore};
use docvault_entity::document::{
    CreateDocument, DocumentDetail, FileVersion, NewFileVersion, UpdateDocument,
};
use docvault_storage::generate_storage_key;
use docvault_storage::mime::{DEFAULT_MIME_TYPE, mime_from_path};

use super::upload::{UploadPolicy, UploadedFile};
use crate::cleanup::{CleanupReport, remove_stored_files};
use crate::naming::normalize_name;

/// An opened stored file ready to stream to a client.
pub struct Download {
    /// Filename to present to the client.
    pub file_name: String,
    /// Content type guessed from the filename.
    pub content_type: String,
    /// Size in bytes as recorded at upload.
    pub size: i64,
    /// File contents.
    pub stream: ByteStream,
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Manages documents and their uploaded versions.
#[derive(Debug, Clone)]
pub struct DocumentService {
    folders: Arc<dyn FolderStore>,
    documents: Arc<dyn DocumentStore>,
    storage: Arc<dyn StorageProvider>,
    policy: UploadPolicy,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn StorageProvider>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            folders,
            documents,
            storage,
            policy,
        }
    }

    /// The upload policy in force.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Create a document in `data.folder_id` with `file` as its first version.
    ///
    /// The file is stored before the records are written; if the records
    /// fail, the stored file is removed again.
    pub async fn create_document(
        &self,
        mut data: CreateDocument,
        file: UploadedFile,
    ) -> AppResult<DocumentDetail> {
        data.title = normalize_name("title", &data.title)?;
        self.require_folder(data.folder_id).await?;
        self.policy.check(&file)?;

        let version = self.store_file(&file).await?;
        let detail = match self.documents.create(&data, &version).await {
            Ok(detail) => detail,
            Err(e) => {
                self.discard(&version.path).await;
                return Err(e);
            }
        };

        info!(
            document_id = %detail.document.id,
            folder_id = %data.folder_id,
            size = version.size,
            "Document created"
        );
        Ok(detail)
    }

    /// Documents in a folder, each with its versions newest first.
    pub async fn list_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<DocumentDetail>> {
        self.require_folder(folder_id).await?;
        self.documents.find_by_folder(folder_id).await
    }

    /// A single document with its versions.
    pub async fn get_document(&self, id: DocumentId) -> AppResult<DocumentDetail> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Replace a document's title and description.
    pub async fn update_document(
        &self,
        id: DocumentId,
        mut data: UpdateDocument,
    ) -> AppResult<DocumentDetail> {
        data.title = normalize_name("title", &data.title)?;
        let detail = self
            .documents
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;

        info!(document_id = %id, "Document updated");
        Ok(detail)
    }

    /// Delete a document and its versions, then remove the stored files.
    pub async fn delete_document(&self, id: DocumentId) -> AppResult<CleanupReport> {
        let detail = self.get_document(id).await?;

        if !self.documents.delete(id).await? {
            return Err(AppError::not_found(format!("Document {id} not found")));
        }

        let report = remove_stored_files(self.storage.as_ref(), &detail.versions).await;
        info!(
            document_id = %id,
            files = report.attempted,
            failed = report.failed.len(),
            "Document deleted"
        );
        Ok(report)
    }

    /// Upload a new version of an existing document.
    pub async fn add_version(
        &self,
        document_id: DocumentId,
        file: UploadedFile,
    ) -> AppResult<FileVersion> {
        self.get_document(document_id).await?;
        self.policy.check(&file)?;

        let version = self.store_file(&file).await?;
        let created = match self.documents.create_version(document_id, &version).await {
            Ok(created) => created,
            Err(e) => {
                self.discard(&version.path).await;
                return Err(e);
            }
        };

        info!(
            document_id = %document_id,
            version_id = %created.id,
            size = created.size,
            "Document version added"
        );
        Ok(created)
    }

    /// Open a specific version for download.
    pub async fn open_version(&self, version_id: FileVersionId) -> AppResult<Download> {
        let version = self
            .documents
            .find_version(version_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File version {version_id} not found")))?;
        self.open(version).await
    }

    /// Open the most recent version of a document for download.
    pub async fn open_latest(&self, document_id: DocumentId) -> AppResult<Download> {
        self.get_document(document_id).await?;
        let version = self
            .documents
            .latest_version(document_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Document {document_id} has no file versions"))
            })?;
        self.open(version).await
    }

    async fn open(&self, version: FileVersion) -> AppResult<Download> {
        let stream = self.storage.read(&version.path).await?;
        let content_type = mime_from_path(&version.name).unwrap_or(DEFAULT_MIME_TYPE);
        Ok(Download {
            content_type: content_type.to_string(),
            file_name: version.name,
            size: version.size,
            stream,
        })
    }

    async fn store_file(&self, file: &UploadedFile) -> AppResult<NewFileVersion> {
        let path = generate_storage_key(&file.file_name);
        self.storage.write(&path, file.data.clone()).await?;

        Ok(NewFileVersion {
            path,
            name: file.file_name.clone(),
            size: i64::try_from(file.size())
                .map_err(|_| AppError::payload_too_large("File is too large"))?,
            mime_type: file.essence(),
        })
    }

    async fn discard(&self, path: &str) {
        if let Err(e) = self.storage.delete(path).await {
            warn!(path, error = %e, "Failed to remove stored file after rejected upload");
        }
    }

    async fn require_folder(&self, id: FolderId) -> AppResult<()> {
        self.folders
            .find_by_id(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::TryStreamExt;

    use docvault_core::error::ErrorKind;
    use docvault_database::repositories::MemoryStore;
    use docvault_entity::folder::CreateFolder;

    use super::*;
    use crate::testing::FlakyStorage;

    struct Fixture {
        service: DocumentService,
        store: MemoryStore,
        storage: FlakyStorage,
        folder_id: FolderId,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let storage = FlakyStorage::new();
        let folder_id = FolderStore::create(
            &store,
            &CreateFolder {
                name: "Contracts".into(),
                position: None,
            },
        )
        .await
        .unwrap()
        .id;

        let service = DocumentService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(storage.clone()),
            UploadPolicy::new(1024, vec!["application/pdf".into(), "image/png".into()]),
        );
        Fixture {
            service,
            store,
            storage,
            folder_id,
        }
    }

    fn pdf(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            data: Bytes::from_static(body),
        }
    }

    fn create(folder_id: FolderId, title: &str) -> CreateDocument {
        CreateDocument {
            folder_id,
            title: title.to_string(),
            description: Some("signed copy".into()),
        }
    }

    #[tokio::test]
    async fn test_create_stores_file_and_records() {
        let f = fixture().await;
        let detail = f
            .service
            .create_document(create(f.folder_id, "Lease"), pdf("lease.pdf", b"lease"))
            .await
            .unwrap();

        assert_eq!(detail.document.title, "Lease");
        assert_eq!(detail.document.mime_type, "application/pdf");
        assert_eq!(detail.versions.len(), 1);
        assert_eq!(detail.versions[0].name, "lease.pdf");
        assert_eq!(detail.versions[0].size, 5);
        assert_eq!(f.storage.paths(), vec![detail.versions[0].path.clone()]);
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_before_storing() {
        let f = fixture().await;
        let err = f
            .service
            .create_document(create(f.folder_id, " \t "), pdf("blank.pdf", b"x"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.details.unwrap()["title"][0], "must not be blank");
        assert!(f.storage.paths().is_empty());

        let detail = f
            .service
            .create_document(create(f.folder_id, "  Lease  "), pdf("lease.pdf", b"l"))
            .await
            .unwrap();
        assert_eq!(detail.document.title, "Lease");

        let err = f
            .service
            .update_document(
                detail.document.id,
                UpdateDocument {
                    title: "   ".into(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(
            f.service
                .get_document(detail.document.id)
                .await
                .unwrap()
                .document
                .title,
            "Lease"
        );
    }

    #[tokio::test]
    async fn test_create_in_missing_folder_stores_nothing() {
        let f = fixture().await;
        let err = f
            .service
            .create_document(create(FolderId::new(), "Lost"), pdf("lost.pdf", b"x"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(f.storage.paths().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_policy_violations() {
        let f = fixture().await;

        let gif = UploadedFile {
            file_name: "anim.gif".into(),
            content_type: "image/gif".into(),
            data: Bytes::from_static(b"GIF89a"),
        };
        let err = f
            .service
            .create_document(create(f.folder_id, "Anim"), gif)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMediaType);

        let big = UploadedFile {
            file_name: "big.pdf".into(),
            content_type: "application/pdf".into(),
            data: Bytes::from(vec![0u8; 1025]),
        };
        let err = f
            .service
            .create_document(create(f.folder_id, "Big"), big)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

        assert!(f.storage.paths().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_file() {
        let f = fixture().await;
        // The document store does not know the folder, so the insert fails
        // after the bytes were written.
        let service = DocumentService::new(
            Arc::new(f.store.clone()),
            Arc::new(MemoryStore::new()),
            Arc::new(f.storage.clone()),
            f.service.policy().clone(),
        );

        let err = service
            .create_document(create(f.folder_id, "Ghost"), pdf("ghost.pdf", b"boo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(f.storage.delete_attempts().len(), 1);
        assert!(f.storage.paths().is_empty());
    }

    #[tokio::test]
    async fn test_versions_and_downloads() {
        let f = fixture().await;
        let detail = f
            .service
            .create_document(create(f.folder_id, "Plan"), pdf("plan-v1.pdf", b"one"))
            .await
            .unwrap();
        let id = detail.document.id;

        let png = UploadedFile {
            file_name: "plan-v2.png".into(),
            content_type: "image/png".into(),
            data: Bytes::from_static(b"two"),
        };
        let second = f.service.add_version(id, png).await.unwrap();

        let latest = f.service.open_latest(id).await.unwrap();
        assert_eq!(latest.file_name, "plan-v2.png");
        assert_eq!(latest.content_type, "image/png");
        let body: Vec<Bytes> = latest.stream.try_collect().await.unwrap();
        assert_eq!(body.concat(), b"two");

        let first = f.service.open_version(detail.versions[0].id).await.unwrap();
        assert_eq!(first.file_name, "plan-v1.pdf");
        assert_eq!(first.content_type, "application/pdf");

        let refreshed = f.service.get_document(id).await.unwrap();
        assert_eq!(refreshed.document.mime_type, "image/png");
        assert_eq!(refreshed.versions[0].id, second.id);
    }

    #[tokio::test]
    async fn test_add_version_to_missing_document() {
        let f = fixture().await;
        let err = f
            .service
            .add_version(DocumentId::new(), pdf("x.pdf", b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(f.storage.paths().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let f = fixture().await;
        let detail = f
            .service
            .create_document(create(f.folder_id, "Draft"), pdf("draft.pdf", b"d"))
            .await
            .unwrap();
        let id = detail.document.id;

        let updated = f
            .service
            .update_document(
                id,
                UpdateDocument {
                    title: "Final".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.document.title, "Final");
        assert_eq!(updated.document.description, None);

        f.service
            .add_version(id, pdf("final.pdf", b"f"))
            .await
            .unwrap();
        let report = f.service.delete_document(id).await.unwrap();
        assert_eq!(report.attempted, 2);
        assert!(report.is_clean());
        assert!(f.storage.paths().is_empty());
        assert!(f.store.list_all().await.unwrap().is_empty());

        let err = f.service.get_document(id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_in_folder() {
        let f = fixture().await;
        f.service
            .create_document(create(f.folder_id, "One"), pdf("1.pdf", b"1"))
            .await
            .unwrap();
        f.service
            .create_document(create(f.folder_id, "Two"), pdf("2.pdf", b"2"))
            .await
            .unwrap();

        let docs = f.service.list_in_folder(f.folder_id).await.unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d.document.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);

        let err = f
            .service
            .list_in_folder(FolderId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_open_latest_without_document() {
        let f = fixture().await;
        let err = f.service.open_latest(DocumentId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
