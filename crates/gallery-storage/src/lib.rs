//! Gallery Storage Library
//!
//! This crate provides the object-storage abstraction and implementations for
//! the gallery ingestion pipeline. It includes the `ObjectStorage` trait and
//! implementations for S3-compatible object stores and the Cloudinary image
//! CDN.
//!
//! # Storage key format
//!
//! Keys are namespaced by artifact kind and derived from random identifiers,
//! never from user input:
//!
//! - **Originals**: `images/{uuid}{.ext}` (extension taken from the uploaded
//!   filename, lowercased)
//! - **Thumbnails**: `thumbnails/{uuid}`
//!
//! Key generation is centralized in the `keys` module so all backends and the
//! coordinator stay consistent.

#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::CloudinaryStorage;
pub use factory::create_storage;
pub use gallery_core::BackendKind;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
