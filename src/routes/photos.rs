use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::photos;
use crate::state::SharedState;
use crate::submission::parser::{self, PhotoParseError};

pub const UPLOAD_FAILED: &str = "Failed to upload photos";

pub async fn upload_photos(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let uploads = parser::parse_photos(&headers, body).await.map_err(|e| match e {
        PhotoParseError::TooLarge => AppError::BadRequest(photos::BAD_FILE.to_string()),
        PhotoParseError::Malformed(msg) => {
            tracing::error!("Photo upload parse error: {msg}");
            AppError::Failed(UPLOAD_FAILED.to_string())
        }
    })?;

    photos::validate_batch(&uploads).map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let urls = state.photo_store.store(&uploads).await.map_err(|e| {
        tracing::error!("Photo store {} failed: {e}", state.photo_store.id());
        AppError::Failed(UPLOAD_FAILED.to_string())
    })?;

    tracing::info!("Stored {} photos via {}", urls.len(), state.photo_store.id());

    Ok(Json(json!({
        "success": true,
        "count": urls.len(),
        "photoUrls": urls,
    })))
}
