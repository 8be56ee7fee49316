pub mod email;
pub mod sheets;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, SinkKind};
use crate::submission::Submission;

#[derive(Debug)]
pub struct SinkError {
    pub message: String,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for SinkError {
    fn from(s: String) -> Self {
        SinkError { message: s }
    }
}

impl From<&str> for SinkError {
    fn from(s: &str) -> Self {
        SinkError {
            message: s.to_string(),
        }
    }
}

/// The external system that records or notifies on a submission.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    fn id(&self) -> &str;

    /// Client-facing message when required credentials are missing.
    fn not_configured(&self) -> Option<&str>;

    async fn send(&self, submission: &Submission) -> Result<(), SinkError>;

    /// Deliver and report success. Transport errors are logged here and
    /// never escape.
    async fn deliver(&self, submission: &Submission) -> bool {
        match self.send(submission).await {
            Ok(()) => {
                tracing::debug!("Sink {} delivered submission {}", self.id(), submission.id);
                true
            }
            Err(e) => {
                tracing::error!("Sink {} failed for submission {}: {e}", self.id(), submission.id);
                false
            }
        }
    }
}

pub fn build(config: &Config) -> Arc<dyn SubmissionSink> {
    match config.sink {
        SinkKind::Email => Arc::new(email::EmailSink::new(config)),
        SinkKind::Sheets => Arc::new(sheets::SheetsSink::new(config)),
    }
}
