mod common;

use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::json;

use common::{photo, RecordingSink};

const ACK: &str = "Thank you for your submission. We'll get back to you within 24 hours!";

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let mut config = common::test_config();
    config.cors_origins = vec!["https://shop.example".to_string()];
    let app = common::spawn_app_with(config, RecordingSink::default()).await;

    let resp = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/submit-contact"))
        .header("origin", "https://shop.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "https://shop.example"
    );

    let (_, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "phone": "555" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_contact_body_is_json_413() {
    let mut config = common::test_config();
    config.max_body_size = 16 * 1024;
    let app = common::spawn_app_with(config, RecordingSink::default()).await;

    let (body, status) = app
        .submit(&json!({ "name": "Jane", "phone": "555", "message": "x".repeat(32 * 1024) }))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "Request body too large");
    assert_eq!(app.sink.count(), 0);
}

// ── Contact: happy paths ────────────────────────────────────────

#[tokio::test]
async fn phone_without_email_is_accepted() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "phone": "5551234567" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], ACK);

    let s = app.sink.last();
    assert_eq!(s.name, "Jane");
    assert_eq!(s.email, "");
    assert_eq!(s.source, "website");
    assert_eq!(s.subject, "Contact Form Submission");
    assert_eq!(s.ip, "unknown");
}

#[tokio::test]
async fn full_partner_submission_is_sanitized() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit_from(
            Some("198.51.100.23, 10.0.0.1"),
            &json!({
                "name": "  Sam Adjuster  ",
                "email": "sam@insurer.example",
                "subject": "Claim intake",
                "message": "x".repeat(2500),
                "source": "insurance-partner",
                "insurer": "Acme Mutual",
                "claimNumber": "CLM-42",
                "photoUrls": ["https://cdn.example/a.jpg"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let s = app.sink.last();
    assert_eq!(s.name, "Sam Adjuster");
    assert_eq!(s.message.len(), 2000);
    assert_eq!(s.ip, "198.51.100.23");
    assert_eq!(s.source, "insurance-partner");
    assert_eq!(s.photo_urls, vec!["https://cdn.example/a.jpg".to_string()]);
    assert_eq!(s.extras.len(), 2);
}

#[tokio::test]
async fn urlencoded_form_is_accepted() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/api/submit-contact"))
        .form(&[("name", "Jane"), ("email", "jane@example.com"), ("message", "hello")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.sink.last().email, "jane@example.com");
}

#[tokio::test]
async fn user_agent_header_recorded() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/submit-contact"))
        .header("user-agent", "IntakeTest/1.0")
        .header("x-real-ip", "192.0.2.50")
        .json(&json!({ "name": "Jane", "message": "hi", "phone": "555" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let s = app.sink.last();
    assert_eq!(s.user_agent, "IntakeTest/1.0");
    assert_eq!(s.ip, "192.0.2.50");
}

// ── Contact: validation ─────────────────────────────────────────

#[tokio::test]
async fn missing_name_and_message_reported_first() {
    let app = common::spawn_app().await;

    let (body, status) = app.submit(&json!({ "email": "not-an-email" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and message are required");

    let (body, status) = app.submit(&json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and message are required");
    assert_eq!(app.sink.count(), 0);
}

#[tokio::test]
async fn blank_email_and_phone_rejected() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "email": "   ", "phone": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Either email or phone is required");
}

#[tokio::test]
async fn invalid_email_rejected() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "email": "not-an-email", "phone": "555" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");

    let (_, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "email": "a@b.co" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_internal_error() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/submit-contact"))
        .header("content-type", "application/json")
        .body("{name: oops")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
}

// ── Contact: rate limiting ──────────────────────────────────────

#[tokio::test]
async fn sixth_submission_is_rate_limited_regardless_of_body() {
    let app = common::spawn_app().await;
    let valid = json!({ "name": "Jane", "message": "hi", "phone": "555" });

    for _ in 0..5 {
        let (_, status) = app.submit_from(Some("203.0.113.7"), &json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (body, status) = app.submit_from(Some("203.0.113.7"), &valid).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Too many submissions. Please wait before submitting again."
    );

    // Another client is unaffected.
    let (_, status) = app.submit_from(Some("203.0.113.8"), &valid).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.sink.count(), 1);
}

#[tokio::test]
async fn identical_posts_from_one_ip() {
    let app = common::spawn_app().await;
    let body = json!({ "name": "Jane", "message": "hi", "phone": "555" });

    let mut statuses = Vec::new();
    for _ in 0..6 {
        statuses.push(app.submit(&body).await.1);
    }
    assert_eq!(&statuses[..5], &[StatusCode::OK; 5]);
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

// ── Contact: sink outcomes ──────────────────────────────────────

#[tokio::test]
async fn sink_failure_is_opaque_500() {
    let app = common::spawn_app_with(common::test_config(), RecordingSink::failing()).await;

    let (body, status) = app
        .submit(&json!({ "name": "Jane", "message": "hi", "phone": "555" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to submit form. Please try again.");
}

#[tokio::test]
async fn unconfigured_sink_is_503_before_rate_limiting() {
    let app = common::spawn_app_with(common::test_config(), RecordingSink::unconfigured()).await;

    for _ in 0..7 {
        let (body, status) = app.submit(&json!({})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["error"],
            "Email service is not configured. Please contact us directly."
        );
    }
}

// ── Photos ──────────────────────────────────────────────────────

#[tokio::test]
async fn upload_without_files_rejected() {
    let app = common::spawn_app().await;

    let (body, status) = app.upload(Form::new().text("note", "no photos")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No files provided");
}

#[tokio::test]
async fn six_valid_photos_rejected() {
    let app = common::spawn_app().await;

    let mut form = Form::new();
    for i in 0..6 {
        form = form.part("photos", photo(&format!("p{i}.jpg"), "image/jpeg", 64));
    }
    let (body, status) = app.upload(form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 5 photos allowed");
}

#[tokio::test]
async fn one_pdf_rejects_the_batch() {
    let app = common::spawn_app().await;

    let mut form = Form::new();
    for i in 0..4 {
        form = form.part("photos", photo(&format!("p{i}.png"), "image/png", 64));
    }
    form = form.part("photos", photo("estimate.pdf", "application/pdf", 64));

    let (body, status) = app.upload(form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only JPG/PNG files under 5MB allowed");
}

#[tokio::test]
async fn oversized_photo_rejects_the_batch() {
    let app = common::spawn_app().await;

    let form = Form::new()
        .part("photos", photo("ok.jpg", "image/jpeg", 64))
        .part("photos", photo("big.jpg", "image/jpeg", 5 * 1024 * 1024 + 1));

    let (body, status) = app.upload(form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only JPG/PNG files under 5MB allowed");
}

#[tokio::test]
async fn upload_over_body_limit_is_json_400() {
    let mut config = common::test_config();
    config.max_body_size = 16 * 1024;
    let app = common::spawn_app_with(config, RecordingSink::default()).await;

    let form = Form::new().part("photos", photo("big.jpg", "image/jpeg", 32 * 1024));
    let (body, status) = app.upload(form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only JPG/PNG files under 5MB allowed");
}

#[tokio::test]
async fn inline_upload_returns_data_urls() {
    let app = common::spawn_app().await;

    let form = Form::new()
        .part("photos", photo("a.jpg", "image/jpeg", 16))
        .part("photos", photo("b.png", "image/png", 16));

    let (body, status) = app.upload(form).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    let urls = body["photoUrls"].as_array().unwrap();
    assert!(urls[0].as_str().unwrap().starts_with("data:image/jpeg;base64,"));
    assert!(urls[1].as_str().unwrap().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn local_upload_is_served_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config();
    config.photos.mode = intake::config::PhotoMode::Local;
    config.photos.upload_dir = dir.path().join("uploads");
    let app = common::spawn_app_with(config, RecordingSink::default()).await;

    let (body, status) = app
        .upload(Form::new().part("photos", photo("a.jpg", "image/jpeg", 32)))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 1);

    let url = body["photoUrls"][0].as_str().unwrap();
    assert!(url.starts_with("/uploads/contact_"));

    let resp = app.client.get(app.url(url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().len(), 32);
}

#[tokio::test]
async fn non_multipart_upload_fails() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/upload-photos"))
        .json(&json!({ "photos": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to upload photos");
}
