#[path = "helpers/mod.rs"]
mod helpers;

use gallery_core::{Privacy, UploadRequest};
use gallery_ingest::{IngestStage, Ingestor};
use gallery_storage::ObjectStorage;
use helpers::{decoded_dimensions, jpeg_rgb, png_rgba, MockStorage};

#[tokio::test]
async fn test_non_image_content_type_fails_before_any_storage_call() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(b"%PDF-1.4".to_vec(), "application/pdf", "doc.pdf");
    let err = ingestor.ingest(request).await.unwrap_err();

    assert_eq!(err.stage(), IngestStage::Validate);
    assert!(storage.put_calls().is_empty());
    assert!(storage.delete_calls().is_empty());
}

#[tokio::test]
async fn test_zero_byte_upload_fails_validation() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(Vec::new(), "image/png", "empty.png");
    let err = ingestor.ingest(request).await.unwrap_err();

    assert_eq!(err.stage(), IngestStage::Validate);
    assert!(err.to_string().contains("Empty file"));
    assert!(storage.put_calls().is_empty());
}

#[tokio::test]
async fn test_corrupt_image_fails_at_decode() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(b"not an image at all".to_vec(), "image/jpeg", "x.jpg");
    let err = ingestor.ingest(request).await.unwrap_err();

    assert_eq!(err.stage(), IngestStage::Decode);
    assert!(storage.put_calls().is_empty());
}

#[tokio::test]
async fn test_jpeg_upload_commits_with_webp_thumbnail() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let data = jpeg_rgb(1200, 800);
    let byte_size = data.len() as u64;
    let mut request = UploadRequest::new(data, "image/jpeg", "holiday.jpg");
    request.title = Some("Holiday".to_string());
    request.privacy = Privacy::Private;

    let asset = ingestor.ingest(request).await.unwrap();

    assert_eq!(asset.width, 1200);
    assert_eq!(asset.height, 800);
    assert_eq!(asset.mime_type, "image/jpeg");
    assert_eq!(asset.byte_size, byte_size);
    assert_eq!(asset.title.as_deref(), Some("Holiday"));
    assert_eq!(asset.privacy, Privacy::Private);

    // Two distinct, namespaced keys
    assert!(asset.original.key.starts_with("images/"));
    assert!(asset.original.key.ends_with(".jpg"));
    assert!(asset.thumbnail.key.starts_with("thumbnails/"));
    assert_ne!(asset.original.key, asset.thumbnail.key);

    // Both objects actually stored
    assert!(storage.has_object(&asset.original.key));
    assert!(storage.has_object(&asset.thumbnail.key));
    assert_eq!(asset.original.url, storage.resolve_url(&asset.original.key));
    assert!(storage.delete_calls().is_empty());
}

#[tokio::test]
async fn test_thumbnail_dimensions_and_format_for_opaque_jpeg() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(1200, 800), "image/jpeg", "wide.jpg");
    let asset = ingestor.ingest(request).await.unwrap();

    let thumb = storage_object(&storage, &asset.thumbnail.key);
    // RIFF container magic identifies the WebP encoding
    assert_eq!(&thumb[..4], b"RIFF");
    assert_eq!(&thumb[8..12], b"WEBP");

    let (w, h) = decoded_dimensions(&thumb);
    assert_eq!((w, h), (300, 200));
}

#[tokio::test]
async fn test_png_with_alpha_flattens_to_jpeg_thumbnail() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(png_rgba(500, 500), "image/png", "sticker.png");
    let asset = ingestor.ingest(request).await.unwrap();

    let thumb = storage_object(&storage, &asset.thumbnail.key);
    // JPEG magic: SOI marker
    assert_eq!(&thumb[..2], &[0xFF, 0xD8]);
    let (w, h) = decoded_dimensions(&thumb);
    assert!(w <= 300 && h <= 300);
}

#[tokio::test]
async fn test_original_put_failure_issues_no_compensation() {
    let storage = MockStorage::new();
    storage.fail_puts_with_prefix("images/");
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "a.jpg");
    let err = ingestor.ingest(request).await.unwrap_err();

    assert_eq!(err.stage(), IngestStage::StoreOriginal);
    assert!(storage.delete_calls().is_empty());
    assert_eq!(storage.object_count(), 0);
}

#[tokio::test]
async fn test_thumbnail_put_failure_compensates_original() {
    let storage = MockStorage::new();
    storage.fail_puts_with_prefix("thumbnails/");
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "a.jpg");
    let err = ingestor.ingest(request).await.unwrap_err();

    assert_eq!(err.stage(), IngestStage::StoreThumbnail);

    // Exactly one compensating delete, targeting the original's key.
    let deletes = storage.delete_calls();
    assert_eq!(deletes.len(), 1);
    assert!(deletes[0].starts_with("images/"));

    // Post-compensation the original is gone from the backend.
    assert_eq!(storage.object_count(), 0);
}

#[tokio::test]
async fn test_compensation_failure_keeps_primary_error() {
    let storage = MockStorage::new();
    storage.fail_puts_with_prefix("thumbnails/");
    storage.fail_deletes();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "a.jpg");
    let err = ingestor.ingest(request).await.unwrap_err();

    // The delete failure is logged, not surfaced as the primary result.
    assert_eq!(err.stage(), IngestStage::StoreThumbnail);
    assert_eq!(storage.delete_calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_ingestions_generate_distinct_keys() {
    let storage = MockStorage::new();
    let ingestor = std::sync::Arc::new(Ingestor::new(storage.clone()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let ingestor = ingestor.clone();
        handles.push(tokio::spawn(async move {
            let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "same-name.jpg");
            ingestor.ingest(request).await.unwrap()
        }));
    }

    let mut keys = Vec::new();
    for handle in handles {
        let asset = handle.await.unwrap();
        keys.push(asset.original.key);
        keys.push(asset.thumbnail.key);
    }

    let unique: std::collections::HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());
}

#[tokio::test]
async fn test_delete_asset_is_idempotent() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "a.jpg");
    let asset = ingestor.ingest(request).await.unwrap();

    let first = ingestor
        .delete_asset(&asset.original.key, &asset.thumbnail.key)
        .await;
    assert_eq!(first, (true, true));

    let second = ingestor
        .delete_asset(&asset.original.key, &asset.thumbnail.key)
        .await;
    assert_eq!(second, (false, false));
}

#[tokio::test]
async fn test_delete_asset_partial_failure_does_not_block_other() {
    let storage = MockStorage::new();
    let ingestor = Ingestor::new(storage.clone());

    let request = UploadRequest::new(jpeg_rgb(64, 64), "image/jpeg", "a.jpg");
    let asset = ingestor.ingest(request).await.unwrap();

    // Only the thumbnail exists after deleting the original out of band.
    ingestor.delete_asset(&asset.original.key, "nope").await;
    let result = ingestor
        .delete_asset(&asset.original.key, &asset.thumbnail.key)
        .await;
    assert_eq!(result, (false, true));
}

fn storage_object(storage: &MockStorage, key: &str) -> Vec<u8> {
    assert!(storage.has_object(key));
    storage.object_bytes(key).unwrap()
}
