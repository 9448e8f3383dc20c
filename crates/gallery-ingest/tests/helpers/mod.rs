//! Test helpers: in-memory mock storage with failure injection, plus image
//! fixtures generated with the `image` crate.

use async_trait::async_trait;
use gallery_core::BackendKind;
use gallery_storage::{ObjectStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Mock storage implementation that stores objects in memory and records
/// every call for assertions. Put calls whose key starts with a configured
/// prefix fail with a transient upload error.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    put_calls: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<String>>,
    fail_put_prefix: Mutex<Option<String>>,
    fail_delete: Mutex<bool>,
}

impl MockStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every `put` whose key starts with `prefix` fail.
    pub fn fail_puts_with_prefix(&self, prefix: &str) {
        *self.fail_put_prefix.lock().unwrap() = Some(prefix.to_string());
    }

    /// Make every `delete` fail.
    pub fn fail_deletes(&self) {
        *self.fail_delete.lock().unwrap() = true;
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_calls(&self) -> Vec<String> {
        self.put_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        self.put_calls.lock().unwrap().push(key.to_string());

        if let Some(prefix) = self.fail_put_prefix.lock().unwrap().as_deref() {
            if key.starts_with(prefix) {
                return Err(StorageError::UploadFailed(
                    "injected transient network error".to_string(),
                ));
            }
        }

        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("https://storage.test/{}", key))
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        self.delete_calls.lock().unwrap().push(key.to_string());

        if *self.fail_delete.lock().unwrap() {
            return Err(StorageError::DeleteFailed(
                "injected delete failure".to_string(),
            ));
        }

        Ok(self.objects.lock().unwrap().remove(key).is_some())
    }

    fn resolve_url(&self, key: &str) -> String {
        format!("https://storage.test/{}", key)
    }

    fn backend_kind(&self) -> BackendKind {
        BackendKind::S3
    }
}

/// Encode a solid-color RGB image as JPEG.
pub fn jpeg_rgb(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 120])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Jpeg)
        .unwrap();
    buffer
}

/// Encode a semi-transparent RGBA image as PNG.
pub fn png_rgba(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([180, 40, 90, 128]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

/// Decode dimensions of an encoded image.
pub fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}
