//! Cloudinary storage implementation.
//!
//! Uploads go through Cloudinary's REST API with SHA-256 request signing.
//! The payload is sent as a base64 data URI form field, so no multipart
//! support is needed. Public URLs come back from the upload response
//! (`secure_url`); `resolve_url` rebuilds the deterministic delivery URL.

use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use gallery_core::BackendKind;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary managed image CDN backend
#[derive(Clone)]
pub struct CloudinaryStorage {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStorage {
    /// Create a new CloudinaryStorage instance and probe connectivity.
    ///
    /// Construction fails fast when the account cannot be reached or the
    /// credentials are rejected.
    pub async fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> StorageResult<Self> {
        let storage = CloudinaryStorage {
            cloud_name,
            api_key,
            api_secret,
            client: reqwest::Client::new(),
        };
        storage.probe().await?;
        Ok(storage)
    }

    async fn probe(&self) -> StorageResult<()> {
        let url = format!("{}/{}/ping", API_BASE, self.cloud_name);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!("Cloudinary unreachable: {}", e))
            })?;

        if response.status().is_success() {
            tracing::info!(cloud_name = %self.cloud_name, "Cloudinary account reachable");
            Ok(())
        } else {
            tracing::error!(
                cloud_name = %self.cloud_name,
                status = %response.status(),
                "Cloudinary connectivity probe failed"
            );
            Err(StorageError::ConfigError(format!(
                "Cloudinary ping returned {}",
                response.status()
            )))
        }
    }

    /// Sign request parameters. `params` must be sorted by key and must not
    /// include `file`, `api_key` or the signature fields.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        to_sign.push_str(&self.api_secret);
        hex::encode(Sha256::digest(to_sign.as_bytes()))
    }

    fn unix_timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string()
    }
}

#[async_trait]
impl ObjectStorage for CloudinaryStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String> {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let timestamp = Self::unix_timestamp();
        let signature = self.sign(&[
            ("overwrite", "true"),
            ("public_id", key),
            ("timestamp", &timestamp),
        ]);
        let file = format!("data:{};base64,{}", content_type, BASE64.encode(&data));

        let url = format!("{}/{}/image/upload", API_BASE, self.cloud_name);
        let form = [
            ("api_key", self.api_key.as_str()),
            ("file", file.as_str()),
            ("overwrite", "true"),
            ("public_id", key),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
            ("timestamp", timestamp.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                cloud_name = %self.cloud_name,
                key = %key,
                status = %status,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "upload returned {}: {}",
                status, body
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("invalid upload response: {}", e)))?;

        tracing::info!(
            cloud_name = %self.cloud_name,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(parsed.secure_url)
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        let start = std::time::Instant::now();

        let timestamp = Self::unix_timestamp();
        let signature = self.sign(&[("public_id", key), ("timestamp", &timestamp)]);

        let url = format!("{}/{}/image/destroy", API_BASE, self.cloud_name);
        let form = [
            ("api_key", self.api_key.as_str()),
            ("public_id", key),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
            ("timestamp", timestamp.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                cloud_name = %self.cloud_name,
                key = %key,
                status = %status,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary destroy failed"
            );
            return Err(StorageError::DeleteFailed(format!(
                "destroy returned {}",
                status
            )));
        }

        let parsed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("invalid destroy response: {}", e)))?;

        match parsed.result.as_str() {
            "ok" => {
                tracing::info!(
                    cloud_name = %self.cloud_name,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloudinary destroy successful"
                );
                Ok(true)
            }
            "not found" => Ok(false),
            other => Err(StorageError::DeleteFailed(format!(
                "destroy returned result '{}'",
                other
            ))),
        }
    }

    fn resolve_url(&self, key: &str) -> String {
        format!(
            "https://res.cloudinary.com/{}/image/upload/{}",
            self.cloud_name, key
        )
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::Cloudinary
    }
}
