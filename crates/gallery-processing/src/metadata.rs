//! Image metadata extraction: dimensions + embedded EXIF tags.
//!
//! Dimension extraction is fatal to the pipeline when it fails (the image
//! cannot be processed further). EXIF extraction is best-effort: every
//! decode error is swallowed and yields an empty tag map.

use image::ImageReader;
use std::collections::HashMap;
use std::io::Cursor;

/// Metadata extraction errors
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Metadata derived from one uploaded image.
#[derive(Debug, Clone)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// EXIF tag name → display value, e.g. "Model" → "PowerShot". Empty when
    /// the image carries no readable EXIF block.
    pub tags: HashMap<String, String>,
}

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract dimensions and EXIF tags from raw image bytes.
    pub fn extract(data: &[u8]) -> Result<ImageMetadata, MetadataError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| MetadataError::DecodeFailed(e.to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| MetadataError::DecodeFailed(e.to_string()))?;

        let tags = Self::exif_tags(data);

        Ok(ImageMetadata {
            width,
            height,
            tags,
        })
    }

    /// Best-effort EXIF read. Images without EXIF (most PNGs, screenshots,
    /// generated images) simply produce an empty map.
    fn exif_tags(data: &[u8]) -> HashMap<String, String> {
        let mut cursor = Cursor::new(data);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(e) => {
                tracing::debug!(error = %e, "No readable EXIF metadata");
                return HashMap::new();
            }
        };

        exif.fields()
            .filter(|f| f.ifd_num == exif::In::PRIMARY)
            .map(|f| {
                (
                    f.tag.to_string(),
                    f.display_value().with_unit(&exif).to_string(),
                )
            })
            .collect()
    }
}
