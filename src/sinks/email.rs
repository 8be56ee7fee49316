use async_trait::async_trait;

use super::{SinkError, SubmissionSink};
use crate::config::{Config, MailConfig};
use crate::email::{Mailer, OutgoingEmail};
use crate::submission::Submission;

pub const NOT_CONFIGURED: &str = "Email service is not configured. Please contact us directly.";

/// Notifies the shop inbox about each submission.
pub struct EmailSink {
    mail: MailConfig,
    site_label: String,
    mailer: Option<Mailer>,
}

impl EmailSink {
    pub fn new(config: &Config) -> Self {
        let mailer = Mailer::from_config(&config.mail);
        if mailer.is_none() {
            tracing::warn!("No email credentials configured; contact submissions will get 503");
        }

        Self {
            mail: config.mail.clone(),
            site_label: config.site_label.clone(),
            mailer,
        }
    }
}

#[async_trait]
impl SubmissionSink for EmailSink {
    fn id(&self) -> &str {
        "email"
    }

    fn not_configured(&self) -> Option<&str> {
        self.mailer.is_none().then_some(NOT_CONFIGURED)
    }

    async fn send(&self, submission: &Submission) -> Result<(), SinkError> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| SinkError::from("Missing email credentials"))?;

        let email = OutgoingEmail::for_submission(&self.mail, &self.site_label, submission)?;
        mailer.send(&email).await?;

        tracing::info!("Email sent for submission {} ({})", submission.id, submission.name);
        Ok(())
    }
}
