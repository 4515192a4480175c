pub mod queue;
pub mod smtp;
pub mod template;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use queue::{run_notification_worker, Notifier};
pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport is not configured")]
    Disabled,

    #[error("invalid address {0}")]
    Address(String),

    #[error("failed to read attachment {path}: {reason}")]
    Attachment { path: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp delivery failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentRef {
    pub filename: String,
    pub content_type: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachments: Vec<AttachmentRef>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<String, MailError>;
}

pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _notification: &Notification) -> Result<String, MailError> {
        Err(MailError::Disabled)
    }
}
