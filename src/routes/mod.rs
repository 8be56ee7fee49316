pub mod contact;
pub mod photos;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn intake_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit-contact", post(contact::submit_contact))
        .route("/api/submit-contact", post(contact::submit_contact))
        .route("/upload-photos", post(photos::upload_photos))
        .route("/api/upload-photos", post(photos::upload_photos))
}
