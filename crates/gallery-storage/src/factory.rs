#[cfg(feature = "storage-cloudinary")]
use crate::CloudinaryStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{BackendKind, ObjectStorage, StorageError, StorageResult};
use gallery_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration.
///
/// Exactly one backend must be selected and fully configured; anything else
/// is a `ConfigError` so the process refuses to serve uploads rather than
/// silently no-op.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    let backend = config
        .storage_backend()
        .ok_or_else(|| StorageError::ConfigError("STORAGE_BACKEND not configured".to_string()))?;

    match backend {
        #[cfg(feature = "storage-s3")]
        BackendKind::S3 => {
            let bucket = config
                .storage
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.storage.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.storage.s3_endpoint.clone();

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        BackendKind::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-cloudinary")]
        BackendKind::Cloudinary => {
            let cloud_name = config.storage.cloudinary_cloud_name.clone().ok_or_else(|| {
                StorageError::ConfigError("CLOUDINARY_CLOUD_NAME not configured".to_string())
            })?;
            let api_key = config.storage.cloudinary_api_key.clone().ok_or_else(|| {
                StorageError::ConfigError("CLOUDINARY_API_KEY not configured".to_string())
            })?;
            let api_secret = config.storage.cloudinary_api_secret.clone().ok_or_else(|| {
                StorageError::ConfigError("CLOUDINARY_API_SECRET not configured".to_string())
            })?;

            let storage = CloudinaryStorage::new(cloud_name, api_key, api_secret).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        BackendKind::Cloudinary => Err(StorageError::ConfigError(
            "Cloudinary storage backend not available (storage-cloudinary feature not enabled)"
                .to_string(),
        )),
    }
}
