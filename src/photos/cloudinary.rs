use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{photo_id, PhotoStore, PhotoUpload};
use crate::config::CloudinaryConfig;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed uploads to Cloudinary, one request per photo, all in flight at once.
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    async fn upload_one(&self, photo: &PhotoUpload, public_id: String, timestamp: i64) -> Result<String, String> {
        let timestamp = timestamp.to_string();
        let params = [
            ("folder", self.config.folder.as_str()),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let file = Part::bytes(photo.data.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(|e| format!("Invalid content type: {e}"))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Upload of {public_id} failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(format!("Upload of {public_id} returned {status}: {detail}"));
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| format!("Invalid upload response for {public_id}: {e}"))?;

        Ok(body.secure_url)
    }
}

/// Cloudinary request signature: params sorted by key, joined as a query
/// string, secret appended, SHA-256 hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

#[async_trait]
impl PhotoStore for CloudinaryStore {
    fn id(&self) -> &str {
        "cloudinary"
    }

    async fn store(&self, photos: &[PhotoUpload]) -> Result<Vec<String>, String> {
        let timestamp = chrono::Utc::now().timestamp();
        let timestamp_ms = chrono::Utc::now().timestamp_millis();

        let uploads = photos
            .iter()
            .enumerate()
            .map(|(index, photo)| self.upload_one(photo, photo_id(timestamp_ms, index), timestamp));

        let urls = try_join_all(uploads).await?;
        tracing::debug!("Uploaded {} photos to {}", urls.len(), self.config.folder);
        Ok(urls)
    }
}
