//! PostgreSQL folder repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_entity::folder::{CreateFolder, Folder, PositionUpdate};

use crate::store::FolderStore;

/// Folder persistence over a `folders` table with a dense `position` column.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn list_ordered(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY position ASC, created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Serializes concurrent creates so two inserts cannot claim one slot.
        sqlx::query("LOCK TABLE folders IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock folders", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;

        let len = i32::try_from(count)
            .map_err(|_| AppError::internal("Folder count exceeds position range"))?;
        let position = data.position.map_or(len, |p| p.clamp(0, len));

        sqlx::query(
            "UPDATE folders SET position = position + 1, updated_at = NOW() WHERE position >= $1",
        )
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to shift folders", e))?;

        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, position) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(&data.name)
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder creation", e)
        })?;

        Ok(folder)
    }

    async fn update(
        &self,
        id: FolderId,
        name: Option<&str>,
        positions: &[PositionUpdate],
    ) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(name) = name {
            let result =
                sqlx::query("UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1")
                    .bind(id)
                    .bind(name)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to rename folder", e)
                    })?;
            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("Folder {id} not found")));
            }
        }

        write_positions(&mut tx, positions).await?;

        let folder = sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folder", e))?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder update", e)
        })?;

        debug!(folder_id = %id, updated = positions.len(), "Folder updated");
        Ok(folder)
    }

    async fn apply_positions(&self, updates: &[PositionUpdate]) -> AppResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        write_positions(&mut tx, updates).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder positions", e)
        })?;

        debug!(updated = updates.len(), "Folder positions applied");
        Ok(())
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed: Option<i32> =
            sqlx::query_scalar("DELETE FROM folders WHERE id = $1 RETURNING position")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
                })?;

        let Some(position) = removed else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE folders SET position = position - 1, updated_at = NOW() WHERE position > $1",
        )
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compact positions", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder deletion", e)
        })?;

        Ok(true)
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;
        Ok(count as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// Write each position inside `tx`.
///
/// A missing folder returns NotFound; the caller's dropped transaction then
/// rolls back every prior write.
async fn write_positions(
    tx: &mut Transaction<'_, Postgres>,
    updates: &[PositionUpdate],
) -> AppResult<()> {
    for update in updates {
        let result =
            sqlx::query("UPDATE folders SET position = $2, updated_at = NOW() WHERE id = $1")
                .bind(update.folder_id)
                .bind(update.position)
                .execute(&mut **tx)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to update folder position",
                        e,
                    )
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                update.folder_id
            )));
        }
    }
    Ok(())
}
