//! Gallery Ingest Library
//!
//! The ingestion coordinator: drives one upload through
//! validate → extract metadata → thumbnail → store original → store
//! thumbnail, with a compensating delete when the thumbnail store fails
//! after the original was already written. Also exposes the asset-deletion
//! flow used when an asset record is removed.

pub mod coordinator;

// Re-export commonly used types
pub use coordinator::{IngestError, IngestStage, Ingestor};
