//! Best-effort removal of stored binaries after their records are gone.

use serde::Serialize;
use tracing::{debug, warn};

use docvault_core::traits::storage::StorageProvider;
use docvault_entity::document::FileVersion;

/// What happened when removing stored files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Number of removals attempted.
    pub attempted: usize,
    /// Storage keys that could not be removed.
    pub failed: Vec<String>,
}

impl CleanupReport {
    /// Number of files actually removed.
    pub fn removed(&self) -> usize {
        self.attempted - self.failed.len()
    }

    /// Whether every removal succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete the stored file of every version.
///
/// Every removal is attempted; failures are logged and collected, never
/// returned as errors.
pub async fn remove_stored_files(
    storage: &dyn StorageProvider,
    versions: &[FileVersion],
) -> CleanupReport {
    let mut report = CleanupReport::default();

    for version in versions {
        report.attempted += 1;
        match storage.delete(&version.path).await {
            Ok(()) => debug!(path = %version.path, version_id = %version.id, "Stored file removed"),
            Err(e) => {
                warn!(
                    path = %version.path,
                    version_id = %version.id,
                    error = %e,
                    "Failed to remove stored file"
                );
                report.failed.push(version.path.clone());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use docvault_core::types::{DocumentId, FileVersionId};

    use super::*;
    use crate::testing::FlakyStorage;

    fn version(path: &str) -> FileVersion {
        FileVersion {
            id: FileVersionId::new(),
            document_id: DocumentId::new(),
            path: path.to_string(),
            name: path.to_string(),
            size: 1,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_cleanup() {
        let storage = FlakyStorage::new();
        storage.put("a.pdf", b"a");
        storage.put("c.pdf", b"c");
        storage.fail_deletes_of("c.pdf");

        let versions = [version("a.pdf"), version("b.pdf"), version("c.pdf")];
        let report = remove_stored_files(&storage, &versions).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.failed, vec!["b.pdf".to_string(), "c.pdf".to_string()]);
        assert_eq!(report.removed(), 1);
        assert!(!report.is_clean());
        assert_eq!(storage.delete_attempts(), vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn test_nothing_to_remove() {
        let storage = FlakyStorage::new();
        let report = remove_stored_files(&storage, &[]).await;
        assert_eq!(report, CleanupReport::default());
        assert!(report.is_clean());
    }
}
