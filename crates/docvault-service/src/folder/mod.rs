//! Folder ordering and folder lifecycle.

pub mod reorder;
pub mod service;

pub use reorder::{ReorderError, ReorderPlan, plan_reorder};
pub use service::{FolderService, UpdateFolderRequest};
