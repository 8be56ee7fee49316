use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::{photo_id, PhotoStore, PhotoUpload};

/// Writes photos under a local directory served at `url_prefix`.
pub struct LocalStore {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalStore {
    pub fn new(dir: PathBuf, url_prefix: String) -> Self {
        Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PhotoStore for LocalStore {
    fn id(&self) -> &str {
        "local"
    }

    async fn store(&self, photos: &[PhotoUpload]) -> Result<Vec<String>, String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| format!("Failed to create {}: {e}", self.dir.display()))?;

        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut urls = Vec::with_capacity(photos.len());

        for (index, photo) in photos.iter().enumerate() {
            // Same-millisecond batches share the id prefix; the uuid keeps names apart.
            let file_name = format!(
                "{}_{}.{}",
                photo_id(timestamp, index),
                Uuid::now_v7().simple(),
                photo.extension()
            );
            let path = self.dir.join(&file_name);

            tokio::fs::write(&path, &photo.data)
                .await
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

            urls.push(format!("{}/{file_name}", self.url_prefix));
        }

        tracing::debug!("Stored {} photos in {}", urls.len(), self.dir.display());
        Ok(urls)
    }
}
