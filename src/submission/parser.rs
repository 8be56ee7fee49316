use axum::http::HeaderMap;
use serde_json::{Map, Value};

use crate::photos::{PhotoUpload, MAX_PHOTO_BYTES};

/// Multipart field carrying the uploaded images.
pub const PHOTOS_FIELD: &str = "photos";

/// Parse a contact body based on Content-Type. JSON unless the client says
/// it sent a urlencoded form.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}

#[derive(Debug)]
pub enum PhotoParseError {
    /// A part went past the per-file size cap.
    TooLarge,
    Malformed(String),
}

impl std::fmt::Display for PhotoParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoParseError::TooLarge => write!(f, "Photo exceeds {MAX_PHOTO_BYTES} bytes"),
            PhotoParseError::Malformed(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<multer::Error> for PhotoParseError {
    fn from(e: multer::Error) -> Self {
        match e {
            multer::Error::FieldSizeExceeded { .. } => PhotoParseError::TooLarge,
            other => PhotoParseError::Malformed(format!("Multipart error: {other}")),
        }
    }
}

/// Collect every `photos` part of a multipart body. Other parts are skipped.
/// Each part is capped at `MAX_PHOTO_BYTES` while it is read.
pub async fn parse_photos(headers: &HeaderMap, body: bytes::Bytes) -> Result<Vec<PhotoUpload>, PhotoParseError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| PhotoParseError::Malformed("Missing multipart boundary".to_string()))?;

    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().per_field(MAX_PHOTO_BYTES as u64));
    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    let mut photos = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTOS_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let data = field.bytes().await?;

        photos.push(PhotoUpload {
            file_name,
            content_type,
            data,
        });
    }

    Ok(photos)
}
