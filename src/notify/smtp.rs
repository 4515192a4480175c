use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::notify::{MailError, Mailer, Notification};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|err| MailError::Transport(err.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.account.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

fn mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.parse::<Mailbox>()
        .map_err(|err| MailError::Address(format!("{raw}: {err}")))
}

async fn build_message(notification: &Notification) -> Result<Message, MailError> {
    let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
        notification.text_body.clone(),
        notification.html_body.clone(),
    ));

    for attachment in &notification.attachments {
        let bytes = tokio::fs::read(&attachment.path)
            .await
            .map_err(|err| MailError::Attachment {
                path: attachment.path.display().to_string(),
                reason: err.to_string(),
            })?;

        let content_type = ContentType::parse(
            attachment
                .content_type
                .as_deref()
                .unwrap_or(FALLBACK_CONTENT_TYPE),
        )
        .or_else(|_| ContentType::parse(FALLBACK_CONTENT_TYPE))
        .map_err(|err| MailError::Build(err.to_string()))?;

        body = body.singlepart(Attachment::new(attachment.filename.clone()).body(bytes, content_type));
    }

    Message::builder()
        .from(mailbox(&notification.from)?)
        .to(mailbox(&notification.to)?)
        .subject(notification.subject.clone())
        .multipart(body)
        .map_err(|err| MailError::Build(err.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<String, MailError> {
        let message = build_message(notification).await?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        let text: Vec<String> = response.message().map(|line| line.to_string()).collect();
        Ok(format!("{} {}", response.code(), text.join(" ")))
    }
}
