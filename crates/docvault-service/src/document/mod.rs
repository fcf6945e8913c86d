//! Documents, their file versions, and upload checks.

pub mod service;
pub mod upload;

pub use service::{DocumentService, Download};
pub use upload::{UploadPolicy, UploadedFile};
