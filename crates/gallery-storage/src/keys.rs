//! Shared key generation for storage backends.
//!
//! Keys are derived from freshly generated UUIDs so they never collide across
//! concurrent ingestion attempts and never contain user-controlled path
//! segments. Originals keep the uploaded file's extension for content-type
//! inference by downstream consumers; thumbnails carry none because their
//! encoding is chosen by the pipeline.

use std::path::Path;
use uuid::Uuid;

/// Generate a storage key for an uploaded original: `images/{uuid}{.ext}`.
pub fn original_key(original_filename: &str) -> String {
    let ext = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("images/{}{}", Uuid::new_v4(), ext)
}

/// Generate a storage key for a derived thumbnail: `thumbnails/{uuid}`.
pub fn thumbnail_key() -> String {
    format!("thumbnails/{}", Uuid::new_v4())
}
