pub mod templates;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;

use crate::config::{MailConfig, ResendConfig, SmtpConfig};
use crate::submission::Submission;

/// A fully composed notification, independent of transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    pub fn for_submission(mail: &MailConfig, site_label: &str, s: &Submission) -> Result<Self, String> {
        Ok(Self {
            from: mail.from.clone(),
            to: mail.to.clone(),
            reply_to: s.reply_to(&mail.to).to_string(),
            subject: templates::render_subject(site_label, s),
            html: templates::render_html(s)?,
            text: templates::render_text(s),
        })
    }
}

pub enum Mailer {
    Resend(ResendMailer),
    Smtp(SmtpMailer),
}

impl Mailer {
    /// Resend when an API key is present, SMTP otherwise, `None` when neither
    /// is usable.
    pub fn from_config(mail: &MailConfig) -> Option<Self> {
        if let Some(resend) = &mail.resend {
            tracing::info!("Email transport: Resend");
            return Some(Mailer::Resend(ResendMailer::new(resend)));
        }

        let smtp = mail.smtp.as_ref()?;
        match SmtpMailer::new(smtp) {
            Ok(mailer) => {
                tracing::info!("Email transport: SMTP ({})", smtp.host);
                Some(Mailer::Smtp(mailer))
            }
            Err(e) => {
                tracing::warn!("SMTP not available: {e}");
                None
            }
        }
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        match self {
            Mailer::Resend(m) => m.send(email).await,
            Mailer::Smtp(m) => m.send(email).await,
        }
    }
}

pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ResendMailer {
    pub fn new(config: &ResendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let body = json!({
            "from": &email.from,
            "to": [&email.to],
            "reply_to": &email.reply_to,
            "subject": &email.subject,
            "html": &email.html,
            "text": &email.text,
        });

        let resp = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Resend request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(512)
                .collect::<String>();
            return Err(format!("Resend returned {status}: {detail}"));
        }

        let id = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v["id"].as_str().map(|s| s.to_string()))
            .unwrap_or_default();
        tracing::debug!("Resend accepted message {id}");

        Ok(())
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), String> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

fn build_message(email: &OutgoingEmail) -> Result<Message, String> {
    let mailbox = |addr: &str, what: &str| -> Result<Mailbox, String> {
        addr.parse()
            .map_err(|e| format!("Invalid {what} address: {e}"))
    };

    Message::builder()
        .from(mailbox(&email.from, "from")?)
        .to(mailbox(&email.to, "to")?)
        .reply_to(mailbox(&email.reply_to, "reply-to")?)
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| format!("Failed to build email: {e}"))
}
