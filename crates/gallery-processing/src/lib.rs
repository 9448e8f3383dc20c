//! Gallery Processing Library
//!
//! Image-side building blocks of the ingestion pipeline: upload validation,
//! metadata extraction (dimensions + EXIF tags) and thumbnail derivation.
//! All functions here are synchronous and CPU-bound; callers run them under
//! `tokio::task::spawn_blocking`.

pub mod metadata;
pub mod thumbnail;
pub mod validator;

// Re-export commonly used types
pub use metadata::{ImageMetadata, MetadataError, MetadataExtractor};
pub use thumbnail::{Thumbnail, ThumbnailError, Thumbnailer};
pub use validator::{UploadValidator, ValidationError};
