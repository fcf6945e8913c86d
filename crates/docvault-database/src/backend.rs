//! Store selection by configured provider.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::DatabaseConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::migration::run_migrations;
use crate::repositories::{DocumentRepository, FolderRepository, MemoryStore};
use crate::store::{DocumentStore, FolderStore};

/// The folder and document stores chosen for this process.
///
/// Built once at startup and handed to the services; `close` releases the
/// PostgreSQL pool when one was opened.
#[derive(Debug, Clone)]
pub struct DatabaseBackend {
    provider: &'static str,
    folders: Arc<dyn FolderStore>,
    documents: Arc<dyn DocumentStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseBackend {
    /// Connect to the backend named by `config.provider`.
    ///
    /// For `postgres`, pending migrations run first when
    /// `config.auto_migrate` is set.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store");
                let pool = DatabasePool::connect(config).await?;
                if config.auto_migrate {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Initializing in-memory store");
                Ok(Self::memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Stores backed by an open PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            provider: "postgres",
            folders: Arc::new(FolderRepository::new(pool.pool().clone())),
            documents: Arc::new(DocumentRepository::new(pool.pool().clone())),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            provider: "memory",
            folders: Arc::new(store.clone()),
            documents: Arc::new(store),
            pool: None,
        }
    }

    /// Name of the active provider.
    pub fn provider(&self) -> &str {
        self.provider
    }

    /// The folder store.
    pub fn folders(&self) -> Arc<dyn FolderStore> {
        Arc::clone(&self.folders)
    }

    /// The document store.
    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.documents)
    }

    /// The PostgreSQL pool, when that provider is active.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Whether the active store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.folders.health_check().await
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;
    use docvault_entity::folder::CreateFolder;

    use super::*;

    #[tokio::test]
    async fn test_memory_provider_shares_state() {
        let config = DatabaseConfig {
            provider: "memory".into(),
            ..DatabaseConfig::default()
        };
        let backend = DatabaseBackend::connect(&config).await.expect("connect");
        assert_eq!(backend.provider(), "memory");

        backend
            .folders()
            .create(&CreateFolder {
                name: "Inbox".into(),
                position: None,
            })
            .await
            .expect("create");

        assert_eq!(backend.folders().count().await.expect("count"), 1);
        assert!(backend.health_check().await.expect("health"));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = DatabaseConfig {
            provider: "sqlite".into(),
            ..DatabaseConfig::default()
        };
        let err = DatabaseBackend::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
