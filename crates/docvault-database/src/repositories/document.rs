//! PostgreSQL document and file version repository.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FileVersionId, FolderId};
use docvault_entity::document::{
    CreateDocument, Document, DocumentDetail, FileVersion, NewFileVersion, UpdateDocument,
};

use super::attach_versions;
use crate::store::DocumentStore;

/// Document persistence over the `documents` and `file_versions` tables.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn versions_of(&self, document_id: DocumentId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE document_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn list_all(&self) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<DocumentDetail>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE folder_id = $1 ORDER BY created_at ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))?;

        let versions = self.versions_in_folder(folder_id).await?;
        Ok(attach_versions(documents, versions))
    }

    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<DocumentDetail>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))?;

        match document {
            Some(document) => {
                let versions = self.versions_of(id).await?;
                Ok(Some(DocumentDetail::new(document, versions)))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        data: &CreateDocument,
        version: &NewFileVersion,
    ) -> AppResult<DocumentDetail> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, folder_id, title, description, mime_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(DocumentId::new())
        .bind(data.folder_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&version.mime_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!("Folder {} not found", data.folder_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })?;

        let first = sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions (id, document_id, path, name, size) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(FileVersionId::new())
        .bind(document.id)
        .bind(&version.path)
        .bind(&version.name)
        .bind(version.size)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create version", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit document creation", e)
        })?;

        Ok(DocumentDetail::new(document, vec![first]))
    }

    async fn update(
        &self,
        id: DocumentId,
        data: &UpdateDocument,
    ) -> AppResult<Option<DocumentDetail>> {
        let document = sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update document", e))?;

        match document {
            Some(document) => {
                let versions = self.versions_of(id).await?;
                Ok(Some(DocumentDetail::new(document, versions)))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_version(
        &self,
        document_id: DocumentId,
        version: &NewFileVersion,
    ) -> AppResult<FileVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let touched = sqlx::query(
            "UPDATE documents SET mime_type = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(document_id)
        .bind(&version.mime_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update document", e))?;

        if touched.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document {document_id} not found"
            )));
        }

        let created = sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions (id, document_id, path, name, size) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(FileVersionId::new())
        .bind(document_id)
        .bind(&version.path)
        .bind(&version.name)
        .bind(version.size)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create version", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit new version", e)
        })?;

        Ok(created)
    }

    async fn find_version(&self, id: FileVersionId) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn latest_version(&self, document_id: DocumentId) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE document_id = $1 \
             ORDER BY uploaded_at DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find latest version", e)
        })
    }

    async fn versions_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT v.* FROM file_versions v \
             INNER JOIN documents d ON d.id = v.document_id \
             WHERE d.folder_id = $1 ORDER BY v.uploaded_at DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folder versions", e)
        })
    }
}
