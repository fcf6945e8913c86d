//! Storage provider trait for the binary content behind file versions.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for file storage backends.
///
/// Paths are storage keys relative to the provider root. The local
/// filesystem implementation lives in `docvault-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a stored file as a byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Write bytes to a file at the given path, creating parents.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete the file at the given path.
    ///
    /// A missing file is an error so callers can report it; cleanup
    /// paths decide for themselves whether to swallow it.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether a file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
