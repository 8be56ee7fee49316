pub mod cloudinary;
pub mod inline;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{PhotoConfig, PhotoMode};

pub const MAX_PHOTOS: usize = 5;
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub const NO_FILES: &str = "No files provided";
pub const TOO_MANY: &str = "Maximum 5 photos allowed";
pub const BAD_FILE: &str = "Only JPG/PNG files under 5MB allowed";

/// One uploaded file as received.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn is_acceptable(&self) -> bool {
        ALLOWED_TYPES.contains(&self.content_type.as_str()) && self.data.len() <= MAX_PHOTO_BYTES
    }

    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            _ => "jpg",
        }
    }
}

/// All or nothing: one bad file rejects the batch.
pub fn validate_batch(photos: &[PhotoUpload]) -> Result<(), &'static str> {
    if photos.is_empty() {
        return Err(NO_FILES);
    }
    if photos.len() > MAX_PHOTOS {
        return Err(TOO_MANY);
    }
    if !photos.iter().all(PhotoUpload::is_acceptable) {
        return Err(BAD_FILE);
    }
    Ok(())
}

/// `contact_<millis>_<index>`
pub fn photo_id(timestamp_ms: i64, index: usize) -> String {
    format!("contact_{timestamp_ms}_{index}")
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    fn id(&self) -> &str;

    /// Persist a validated batch, returning one URL per photo in input order.
    /// Any failure fails the whole batch.
    async fn store(&self, photos: &[PhotoUpload]) -> Result<Vec<String>, String>;
}

pub fn build(config: &PhotoConfig) -> Arc<dyn PhotoStore> {
    let store: Arc<dyn PhotoStore> = match (config.mode, &config.cloudinary) {
        (PhotoMode::Inline, _) => Arc::new(inline::InlineStore),
        (PhotoMode::Local, _) | (PhotoMode::Auto, None) => Arc::new(local::LocalStore::new(
            config.upload_dir.clone(),
            config.upload_url_prefix.clone(),
        )),
        (PhotoMode::Cloud | PhotoMode::Auto, Some(cloud)) => {
            Arc::new(cloudinary::CloudinaryStore::new(cloud.clone()))
        }
        (PhotoMode::Cloud, None) => {
            tracing::warn!("Cloud photo mode without credentials; falling back to local disk");
            Arc::new(local::LocalStore::new(
                config.upload_dir.clone(),
                config.upload_url_prefix.clone(),
            ))
        }
    };

    tracing::info!("Photo store: {}", store.id());
    store
}

#[cfg(test)]
pub(crate) fn upload(content_type: &str, size: usize) -> PhotoUpload {
    PhotoUpload {
        file_name: "img".into(),
        content_type: content_type.into(),
        data: Bytes::from(vec![0u8; size]),
    }
}
