use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::photos;

pub const TOO_LARGE: &str = "Request body too large";

/// Replace the body-limit layer's plain-text 413 with the JSON error shape.
/// Photo uploads report it as a rejected file batch.
pub async fn json_payload_limit(req: Request, next: Next) -> Response {
    let is_upload = req.uri().path().ends_with("/upload-photos");

    let response = next.run(req).await;
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    if is_upload {
        AppError::BadRequest(photos::BAD_FILE.to_string()).into_response()
    } else {
        AppError::PayloadTooLarge(TOO_LARGE.to_string()).into_response()
    }
}
