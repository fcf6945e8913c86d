//! Store implementations.

use std::collections::HashMap;

use docvault_core::types::DocumentId;
use docvault_entity::document::{Document, DocumentDetail, FileVersion};

pub mod document;
pub mod folder;
pub mod memory;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
pub use memory::MemoryStore;

/// Group versions under their documents, preserving document order.
pub(crate) fn attach_versions(
    documents: Vec<Document>,
    versions: Vec<FileVersion>,
) -> Vec<DocumentDetail> {
    let mut by_document: HashMap<DocumentId, Vec<FileVersion>> = HashMap::new();
    for version in versions {
        by_document
            .entry(version.document_id)
            .or_default()
            .push(version);
    }

    documents
        .into_iter()
        .map(|document| {
            let versions = by_document.remove(&document.id).unwrap_or_default();
            DocumentDetail::new(document, versions)
        })
        .collect()
}
