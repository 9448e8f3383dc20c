//! Configuration module
//!
//! This module provides configuration for the ingestion pipeline, including
//! storage backend selection and image processing settings. Exactly one
//! storage backend must be active and fully configured; the factory in
//! `gallery-storage` refuses to start otherwise.

use std::env;
use std::str::FromStr;

use crate::backend_types::BackendKind;

const DEFAULT_THUMBNAIL_MAX_DIMENSION: u32 = 300;
const DEFAULT_MAX_FILE_SIZE_MB: usize = 25;

/// Storage backend settings, enumerated for both supported backends.
/// Only the fields of the selected backend are required.
#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub backend: Option<BackendKind>,
    // S3 / S3-compatible object store
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint (MinIO, DigitalOcean Spaces, etc.)
    // Cloudinary managed image CDN
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
}

/// Application configuration for the ingestion pipeline.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageSettings,
    pub max_file_size_bytes: usize,
    pub thumbnail_max_dimension: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(s) if !s.trim().is_empty() => Some(BackendKind::from_str(&s)?),
            _ => None,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let thumbnail_max_dimension = env::var("THUMBNAIL_MAX_DIMENSION")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_THUMBNAIL_MAX_DIMENSION);

        Ok(Config {
            storage: StorageSettings {
                backend,
                s3_bucket: env::var("S3_BUCKET").ok(),
                s3_region: env::var("S3_REGION")
                    .or_else(|_| env::var("AWS_REGION"))
                    .ok(),
                s3_endpoint: env::var("S3_ENDPOINT").ok(),
                cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME").ok(),
                cloudinary_api_key: env::var("CLOUDINARY_API_KEY").ok(),
                cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET").ok(),
            },
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            thumbnail_max_dimension,
        })
    }

    pub fn storage_backend(&self) -> Option<BackendKind> {
        self.storage.backend
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn thumbnail_max_dimension(&self) -> u32 {
        self.thumbnail_max_dimension
    }

    /// Verify that the selected backend has all of its settings present.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage.backend {
            Some(BackendKind::S3) => {
                if self.storage.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET not configured");
                }
                if self.storage.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION not configured");
                }
                Ok(())
            }
            Some(BackendKind::Cloudinary) => {
                if self.storage.cloudinary_cloud_name.is_none()
                    || self.storage.cloudinary_api_key.is_none()
                    || self.storage.cloudinary_api_secret.is_none()
                {
                    anyhow::bail!(
                        "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must all be set"
                    );
                }
                Ok(())
            }
            None => anyhow::bail!("STORAGE_BACKEND not configured"),
        }
    }
}
