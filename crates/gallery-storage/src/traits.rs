//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that all storage backends
//! must implement. The ingestion coordinator is written against this trait
//! only and never branches on the concrete backend.

use async_trait::async_trait;
use gallery_core::BackendKind;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, Cloudinary) must implement this trait. The
/// instance is constructed once at startup (construction performs a
/// connectivity probe and fails fast), then shared read-only across all
/// concurrent ingestion attempts.
///
/// **Key format:** `images/{uuid}{.ext}` for originals,
/// `thumbnails/{uuid}` for thumbnails. See the crate root documentation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload an object under the given key and return its public URL.
    ///
    /// Must be idempotent under retry with the same key (overwrite
    /// semantics): the coordinator may resend a key after a transient
    /// failure of a different stage.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Delete an object by key.
    ///
    /// Deleting a nonexistent key is not an error; it returns `Ok(false)`.
    /// Returns `Ok(true)` when an object was actually removed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Resolve the public URL for a key without a network call.
    fn resolve_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_kind(&self) -> BackendKind;
}
