//! Application state shared across all handlers.

use std::sync::Arc;

use docvault_core::config::AppConfig;
use docvault_core::traits::storage::StorageProvider;
use docvault_database::DatabaseBackend;
use docvault_service::{DocumentService, FolderService, UploadPolicy};

/// Shared dependencies handed to every handler through `State<AppState>`.
///
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The active database backend.
    pub database: DatabaseBackend,
    /// Storage for file version binaries.
    pub storage: Arc<dyn StorageProvider>,
    /// Folder operations.
    pub folder_service: Arc<FolderService>,
    /// Document operations.
    pub document_service: Arc<DocumentService>,
}

impl AppState {
    /// Wire services on top of an opened backend and storage provider.
    pub fn new(
        config: AppConfig,
        database: DatabaseBackend,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        let folder_service = Arc::new(FolderService::new(
            database.folders(),
            database.documents(),
            Arc::clone(&storage),
        ));
        let document_service = Arc::new(DocumentService::new(
            database.folders(),
            database.documents(),
            Arc::clone(&storage),
            UploadPolicy::from_config(&config.storage),
        ));

        Self {
            config: Arc::new(config),
            database,
            storage,
            folder_service,
            document_service,
        }
    }
}
