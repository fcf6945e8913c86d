//! Test doubles shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{ByteStream, StorageProvider};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, Bytes>,
    failing: HashSet<String>,
    delete_attempts: Vec<String>,
}

/// In-memory storage whose deletes can be made to fail per path.
#[derive(Debug, Clone, Default)]
pub struct FlakyStorage {
    inner: Arc<Mutex<Inner>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: &str, data: &[u8]) {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), Bytes::copy_from_slice(data));
    }

    pub fn fail_deletes_of(&self, path: &str) {
        self.inner.lock().unwrap().failing.insert(path.to_string());
    }

    pub fn delete_attempts(&self) -> Vec<String> {
        self.inner.lock().unwrap().delete_attempts.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.inner.lock().unwrap().files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl StorageProvider for FlakyStorage {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self
            .inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Stored file not found: {path}")))?;
        Ok(Box::pin(futures::stream::iter([Ok(data)])))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.inner
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_attempts.push(path.to_string());
        if inner.failing.contains(path) {
            return Err(AppError::new(ErrorKind::Storage, "Simulated delete failure"));
        }
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Stored file not found: {path}")))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().files.contains_key(path))
    }
}
