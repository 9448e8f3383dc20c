//! Gallery Core Library
//!
//! This crate provides core domain models, error types, and configuration
//! that are shared across all gallery components.

pub mod backend_types;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backend_types::BackendKind;
pub use config::{Config, StorageSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{CommittedAsset, Privacy, StoredObject, UploadRequest};
