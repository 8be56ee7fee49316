use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use super::{SinkError, SubmissionSink};
use crate::config::{Config, SheetsConfig};
use crate::submission::{ExtraField, Submission};

pub const NOT_CONFIGURED: &str = "Submission service is not configured. Please contact us directly.";

const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the provider's expiry.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// Column order of the intake sheet. External contract; append only.
pub const COLUMNS: [&str; 13] = [
    "Timestamp",
    "Source",
    "Name",
    "Email",
    "Phone",
    "Subject",
    "Message",
    "Vehicle",
    "Insurer",
    "Claim Number",
    "Photos",
    "IP",
    "User Agent",
];

/// One sheet row for a submission, in `COLUMNS` order.
pub fn row(s: &Submission) -> Vec<String> {
    let extra = |f: ExtraField| s.extra(f).unwrap_or_default().to_string();

    let photos = if s.photo_urls.is_empty() {
        extra(ExtraField::PhotoCount)
    } else {
        s.photo_urls.join("\n")
    };

    vec![
        s.timestamp_rfc3339(),
        s.source.clone(),
        s.name.clone(),
        s.email.clone(),
        s.phone.clone(),
        s.subject.clone(),
        s.message.clone(),
        extra(ExtraField::Vehicle),
        extra(ExtraField::Insurer),
        extra(ExtraField::ClaimNumber),
        photos,
        s.ip.clone(),
        s.user_agent.clone(),
    ]
}

#[derive(Debug, Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Appends each submission as a row to a Google Sheet using a service account.
pub struct SheetsSink {
    config: Option<SheetsConfig>,
    client: reqwest::Client,
    token: Mutex<Option<(String, Instant)>>,
}

impl SheetsSink {
    pub fn new(config: &Config) -> Self {
        if config.sheets.is_none() {
            tracing::warn!("GOOGLE_* credentials missing; contact submissions will get 503");
        }

        Self {
            config: config.sheets.clone(),
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self, config: &SheetsConfig) -> Result<String, SinkError> {
        let mut cached = self.token.lock().await;
        if let Some((token, expires_at)) = cached.as_ref() {
            if Instant::now() + TOKEN_SLACK < *expires_at {
                return Ok(token.clone());
            }
        }

        let assertion = sign_assertion(config, chrono::Utc::now().timestamp())?;

        let resp = self
            .client
            .post(&config.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Token request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(format!("Token endpoint returned {status}: {detail}").into());
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| format!("Invalid token response: {e}"))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS as u64));
        *cached = Some((token.access_token.clone(), Instant::now() + lifetime));

        Ok(token.access_token)
    }
}

/// RS256 JWT asserting the service account identity.
fn sign_assertion(config: &SheetsConfig, now: i64) -> Result<String, SinkError> {
    let claims = ServiceAccountClaims {
        iss: &config.client_email,
        scope: SCOPE,
        aud: &config.token_url,
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    let key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
        .map_err(|e| format!("Invalid service account key: {e}"))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| SinkError::from(format!("Failed to sign assertion: {e}")))
}

fn append_url(config: &SheetsConfig) -> String {
    let range: String = form_urlencoded::byte_serialize(config.range.as_bytes()).collect();
    format!(
        "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        config.api_url.trim_end_matches('/'),
        config.sheet_id,
        range
    )
}

#[async_trait]
impl SubmissionSink for SheetsSink {
    fn id(&self) -> &str {
        "sheets"
    }

    fn not_configured(&self) -> Option<&str> {
        self.config.is_none().then_some(NOT_CONFIGURED)
    }

    async fn send(&self, submission: &Submission) -> Result<(), SinkError> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| SinkError::from("Missing spreadsheet credentials"))?;

        let token = self.access_token(config).await?;

        let resp = self
            .client
            .post(append_url(config))
            .bearer_auth(token)
            .json(&json!({ "values": [row(submission)] }))
            .send()
            .await
            .map_err(|e| format!("Sheets append failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(512)
                .collect::<String>();
            return Err(format!("Sheets returned {status}: {detail}").into());
        }

        tracing::info!("Appended submission {} to sheet", submission.id);
        Ok(())
    }
}
