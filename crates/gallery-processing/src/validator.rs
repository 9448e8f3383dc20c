//! Upload validation.
//!
//! Pure checks that run before any expensive work; no side effects.

/// Validation errors for uploaded payloads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File must be an image (got content type '{content_type}')")]
    NotAnImage { content_type: String },

    #[error("Empty file")]
    EmptyPayload,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },
}

/// Upload validator
///
/// Rejects malformed or empty uploads before the pipeline spends any work on
/// decoding or storage.
#[derive(Debug, Clone, Default)]
pub struct UploadValidator {
    max_file_size: Option<usize>,
}

impl UploadValidator {
    pub fn new(max_file_size: Option<usize>) -> Self {
        Self { max_file_size }
    }

    /// Validate raw payload bytes against the declared content type.
    pub fn validate(&self, data: &[u8], declared_content_type: &str) -> Result<(), ValidationError> {
        if !declared_content_type.to_lowercase().starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                content_type: declared_content_type.to_string(),
            });
        }

        if data.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }

        if let Some(max) = self.max_file_size {
            if data.len() > max {
                return Err(ValidationError::PayloadTooLarge {
                    size: data.len(),
                    max,
                });
            }
        }

        Ok(())
    }
}
