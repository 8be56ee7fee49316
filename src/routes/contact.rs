use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::pipeline;

pub async fn submit_contact(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    pipeline::run(&state, &headers, &body).await?;

    Ok(Json(json!({
        "success": true,
        "message": pipeline::ACKNOWLEDGEMENT,
    })))
}
