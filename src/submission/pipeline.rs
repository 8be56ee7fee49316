use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

use super::fields::ContactFields;
use super::sanitize::sanitize;
use super::{metadata, parser, validate, Submission};

pub const ACKNOWLEDGEMENT: &str =
    "Thank you for your submission. We'll get back to you within 24 hours!";
pub const RATE_LIMITED: &str = "Too many submissions. Please wait before submitting again.";
pub const DELIVERY_FAILED: &str = "Failed to submit form. Please try again.";

const DEFAULT_SOURCE: &str = "website";
const DEFAULT_SUBJECT: &str = "Contact Form Submission";

/// Run one contact request through configuration check, rate limit,
/// validation, sanitization and delivery. Returns the id of the delivered
/// submission.
pub async fn run(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Uuid, AppError> {
    if let Some(message) = state.sink.not_configured() {
        tracing::warn!("Rejecting submission: sink {} is not configured", state.sink.id());
        return Err(AppError::Unavailable(message.to_string()));
    }

    let ip = metadata::client_ip(headers);

    if state.submission_limiter.is_limited(&ip) {
        tracing::warn!("Rate limited submission from {ip}");
        return Err(AppError::RateLimited(RATE_LIMITED.to_string()));
    }

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let raw = parser::parse_body(content_type, body).map_err(AppError::Internal)?;

    let fields = ContactFields::from_value(&raw);
    validate::check(&fields)?;

    let submission = build(fields, ip, metadata::user_agent(headers));

    if !state.sink.deliver(&submission).await {
        return Err(AppError::Failed(DELIVERY_FAILED.to_string()));
    }

    tracing::info!(
        "Accepted submission {} from {} via {} (source={})",
        submission.id,
        submission.ip,
        state.sink.id(),
        submission.source
    );

    Ok(submission.id)
}

/// Assemble a sanitized submission from validated fields.
pub fn build(fields: ContactFields, ip: String, header_user_agent: Option<String>) -> Submission {
    let text = |value: Option<String>, default: &str, max: usize| {
        sanitize(value.as_deref().unwrap_or(default), max)
    };

    let user_agent = fields.user_agent.or(header_user_agent);

    Submission {
        id: Uuid::now_v7(),
        timestamp: Utc::now(),
        source: text(fields.source, DEFAULT_SOURCE, 50),
        name: text(fields.name, "", 100),
        email: text(fields.email, "", 100),
        phone: text(fields.phone, "", 20),
        subject: text(fields.subject, DEFAULT_SUBJECT, 200),
        message: text(fields.message, "", 2000),
        ip,
        user_agent: text(user_agent, "", 500),
        extras: fields
            .extras
            .into_iter()
            .map(|(field, value)| (field, sanitize(&value, field.max_len())))
            .filter(|(_, value)| !value.is_empty())
            .collect(),
        photo_urls: fields.photo_urls,
    }
}
