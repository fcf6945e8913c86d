//! # docvault-storage
//!
//! Storage for the binaries behind file versions: the local filesystem
//! provider, stored-file key generation, and MIME type guessing used
//! when serving downloads.

pub mod key;
pub mod mime;
pub mod providers;

pub use key::generate_storage_key;
pub use mime::mime_from_path;
pub use providers::local::LocalStorageProvider;
