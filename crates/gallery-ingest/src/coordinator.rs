//! Ingestion coordinator.
//!
//! One `Ingestor` instance is shared by all concurrent upload attempts; each
//! attempt owns its own pipeline state and runs strictly sequentially. The
//! original is always stored before the thumbnail, so the compensation path
//! only ever needs to delete one object.

use std::sync::Arc;

use gallery_core::{AppError, CommittedAsset, Config, StoredObject, UploadRequest};
use gallery_processing::{
    MetadataError, MetadataExtractor, ThumbnailError, Thumbnailer, UploadValidator,
    ValidationError,
};
use gallery_storage::{keys, ObjectStorage, StorageError};

/// Pipeline stage at which an ingestion attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Validate,
    Decode,
    Thumbnail,
    StoreOriginal,
    StoreThumbnail,
    BackendUnavailable,
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IngestStage::Validate => "validate",
            IngestStage::Decode => "decode",
            IngestStage::Thumbnail => "thumbnail",
            IngestStage::StoreOriginal => "store_original",
            IngestStage::StoreThumbnail => "store_thumbnail",
            IngestStage::BackendUnavailable => "backend_unavailable",
        };
        write!(f, "{}", name)
    }
}

/// Terminal failure of one ingestion attempt. The coordinator never retries;
/// the caller decides whether to rerun the whole pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Image decode failed: {0}")]
    Decode(#[from] MetadataError),

    #[error("Thumbnail generation failed: {0}")]
    Thumbnail(#[from] ThumbnailError),

    #[error("Failed to store original: {0}")]
    StoreOriginal(#[source] StorageError),

    #[error("Failed to store thumbnail: {0}")]
    StoreThumbnail(#[source] StorageError),

    #[error("No storage backend configured")]
    BackendUnavailable,
}

impl IngestError {
    pub fn stage(&self) -> IngestStage {
        match self {
            IngestError::Validation(_) => IngestStage::Validate,
            IngestError::Decode(_) => IngestStage::Decode,
            IngestError::Thumbnail(_) => IngestStage::Thumbnail,
            IngestError::StoreOriginal(_) => IngestStage::StoreOriginal,
            IngestError::StoreThumbnail(_) => IngestStage::StoreThumbnail,
            IngestError::BackendUnavailable => IngestStage::BackendUnavailable,
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            // Caller faults
            IngestError::Validation(e @ ValidationError::PayloadTooLarge { .. }) => {
                AppError::PayloadTooLarge(e.to_string())
            }
            IngestError::Validation(e) => AppError::InvalidInput(e.to_string()),
            IngestError::Decode(e) => AppError::ImageProcessing(e.to_string()),
            // Server faults
            IngestError::Thumbnail(e) => AppError::Internal(e.to_string()),
            IngestError::StoreOriginal(e) | IngestError::StoreThumbnail(e) => {
                AppError::Storage(e.to_string())
            }
            IngestError::BackendUnavailable => {
                AppError::ServiceUnavailable("no storage backend configured".to_string())
            }
        }
    }
}

/// Ingestion coordinator.
///
/// Holds the shared storage handle (read-only after init) and the pipeline
/// settings. `storage: None` models a process started without a configured
/// backend: every attempt fails with `BackendUnavailable` instead of
/// silently no-opping.
pub struct Ingestor {
    storage: Option<Arc<dyn ObjectStorage>>,
    validator: UploadValidator,
    thumbnailer: Thumbnailer,
}

impl Ingestor {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage: Some(storage),
            validator: UploadValidator::default(),
            thumbnailer: Thumbnailer::default(),
        }
    }

    /// Build an ingestor with limits and thumbnail box taken from config.
    pub fn from_config(config: &Config, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            storage: Some(storage),
            validator: UploadValidator::new(Some(config.max_file_size_bytes())),
            thumbnailer: Thumbnailer::new(config.thumbnail_max_dimension()),
        }
    }

    /// An ingestor with no backend; refuses every attempt.
    pub fn disabled() -> Self {
        Self {
            storage: None,
            validator: UploadValidator::default(),
            thumbnailer: Thumbnailer::default(),
        }
    }

    /// Run one upload through the full pipeline.
    ///
    /// Stage order: validate → metadata → thumbnail → put original → put
    /// thumbnail. Errors before any storage write are side-effect free. A
    /// thumbnail-store failure triggers exactly one best-effort compensating
    /// delete of the original; the delete's own failure is logged and the
    /// primary error is returned unchanged.
    pub async fn ingest(&self, request: UploadRequest) -> Result<CommittedAsset, IngestError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or(IngestError::BackendUnavailable)?
            .clone();

        self.validator
            .validate(&request.data, &request.content_type)?;

        // Image decode is CPU-bound; run off the async pool to avoid blocking
        // other tasks.
        let data = request.data.clone();
        let metadata = tokio::task::spawn_blocking(move || MetadataExtractor::extract(&data))
            .await
            .map_err(|e| MetadataError::DecodeFailed(format!("task failed: {}", e)))??;

        let thumbnailer = self.thumbnailer;
        let data = request.data.clone();
        let thumbnail = tokio::task::spawn_blocking(move || thumbnailer.generate(&data))
            .await
            .map_err(|e| ThumbnailError::EncodeFailed(format!("task failed: {}", e)))??;

        let original_key = keys::original_key(&request.original_filename);
        let original_url = storage
            .put(&original_key, request.data.to_vec(), &request.content_type)
            .await
            .map_err(IngestError::StoreOriginal)?;

        let thumbnail_key = keys::thumbnail_key();
        let thumbnail_url = match storage
            .put(&thumbnail_key, thumbnail.data.to_vec(), thumbnail.content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                // One compensating delete, never retried. A failure here
                // leaves a bounded orphan rather than blocking the response.
                match storage.delete(&original_key).await {
                    Ok(_) => {}
                    Err(cleanup_err) => {
                        tracing::warn!(
                            key = %original_key,
                            error = %cleanup_err,
                            "Compensating delete of original failed; orphan object left behind"
                        );
                    }
                }
                return Err(IngestError::StoreThumbnail(e));
            }
        };

        tracing::info!(
            original_key = %original_key,
            thumbnail_key = %thumbnail_key,
            width = metadata.width,
            height = metadata.height,
            byte_size = request.data.len() as u64,
            "Ingestion committed"
        );

        Ok(CommittedAsset {
            original: StoredObject {
                key: original_key,
                url: original_url,
            },
            thumbnail: StoredObject {
                key: thumbnail_key,
                url: thumbnail_url,
            },
            width: metadata.width,
            height: metadata.height,
            tags: metadata.tags,
            mime_type: request.content_type.clone(),
            byte_size: request.data.len() as u64,
            original_filename: request.original_filename,
            title: request.title,
            caption: request.caption,
            alt_text: request.alt_text,
            privacy: request.privacy,
        })
    }

    /// Delete both objects of an asset independently.
    ///
    /// A failure on one does not block the other; errors are logged and
    /// reported as `false`. Calling twice with the same keys is safe and
    /// yields `(false, false)` the second time. The caller decides whether
    /// partial deletion is acceptable before removing the durable record.
    pub async fn delete_asset(&self, original_key: &str, thumbnail_key: &str) -> (bool, bool) {
        let Some(storage) = self.storage.as_ref() else {
            return (false, false);
        };

        let original_deleted = match storage.delete(original_key).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(key = %original_key, error = %e, "Failed to delete original");
                false
            }
        };

        let thumbnail_deleted = match storage.delete(thumbnail_key).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::warn!(key = %thumbnail_key, error = %e, "Failed to delete thumbnail");
                false
            }
        };

        (original_deleted, thumbnail_deleted)
    }
}
