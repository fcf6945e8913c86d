//! # docvault-service
//!
//! Business logic for DocVault. Services receive their stores and the
//! storage provider through constructor injection as `Arc` trait objects,
//! so the same code runs against PostgreSQL or the in-memory backend.

pub mod cleanup;
pub mod document;
pub mod folder;
pub mod mutation;
pub mod naming;

#[cfg(test)]
pub(crate) mod testing;

pub use cleanup::{CleanupReport, remove_stored_files};
pub use document::{Download, DocumentService, UploadPolicy, UploadedFile};
pub use folder::{FolderService, ReorderError, ReorderPlan, UpdateFolderRequest, plan_reorder};
pub use mutation::{LedgerError, MutationLedger, MutationState};
pub use naming::{MAX_NAME_LEN, normalize_name};
