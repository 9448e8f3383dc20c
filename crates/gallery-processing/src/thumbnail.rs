//! Thumbnail derivation.
//!
//! Scales an uploaded image so its longer edge fits within a bounding box
//! (default 300×300) preserving aspect ratio and never upscaling, then
//! re-encodes. Sources with an alpha channel or a palette are flattened to
//! opaque RGB and encoded as JPEG quality 85; everything else becomes WebP
//! quality 85. Alpha-capable lossy encodings are inconsistently supported
//! downstream, hence the flatten rule.

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

pub const DEFAULT_MAX_DIMENSION: u32 = 300;
const ENCODE_QUALITY: f32 = 85.0;

/// Thumbnail generation errors
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to encode thumbnail: {0}")]
    EncodeFailed(String),
}

/// A derived thumbnail: encoded bytes plus their content type.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub content_type: &'static str,
}

/// Thumbnail generator with a configurable bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Thumbnailer {
    max_dimension: u32,
}

impl Default for Thumbnailer {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl Thumbnailer {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Derive a thumbnail from raw image bytes.
    pub fn generate(&self, data: &[u8]) -> Result<Thumbnail, ThumbnailError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ThumbnailError::DecodeFailed(e.to_string()))?
            .decode()
            .map_err(|e| ThumbnailError::DecodeFailed(e.to_string()))?;

        let flatten = img.color().has_alpha() || is_palette_indexed(data);
        let scaled = self.scale_down(img);

        if flatten {
            let data = encode_jpeg(&scaled)?;
            Ok(Thumbnail {
                data,
                content_type: "image/jpeg",
            })
        } else {
            let data = encode_webp(&scaled)?;
            Ok(Thumbnail {
                data,
                content_type: "image/webp",
            })
        }
    }

    /// Fit the image inside the bounding box preserving aspect ratio. Images
    /// already within the box are returned untouched (no upscaling).
    fn scale_down(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        if width.max(height) <= self.max_dimension {
            return img;
        }
        img.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
    }
}

/// Palette-indexed sources decode to RGB, so the decoded color type alone
/// cannot tell them apart; peek at the container header instead. PNG stores
/// the colour type at byte 25 of the IHDR chunk (3 = indexed); GIF is always
/// palette-based.
fn is_palette_indexed(data: &[u8]) -> bool {
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    if data.starts_with(PNG_MAGIC) {
        return data.get(25) == Some(&3);
    }
    data.starts_with(b"GIF8")
}

/// Flatten to opaque RGB and encode as progressive JPEG via mozjpeg.
fn encode_jpeg(img: &DynamicImage) -> Result<Bytes, ThumbnailError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(ENCODE_QUALITY);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| ThumbnailError::EncodeFailed(e.to_string()))?;
    comp.write_scanlines(&rgb)
        .map_err(|e| ThumbnailError::EncodeFailed(e.to_string()))?;
    let jpeg_data = comp
        .finish()
        .map_err(|e| ThumbnailError::EncodeFailed(e.to_string()))?;

    Ok(Bytes::from(jpeg_data))
}

/// Encode as lossy WebP.
fn encode_webp(img: &DynamicImage) -> Result<Bytes, ThumbnailError> {
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba, width, height);
    let webp_data = encoder.encode(ENCODE_QUALITY);

    Ok(Bytes::copy_from_slice(&webp_data))
}
