use async_trait::async_trait;
use tracing::debug;

use crate::config::MailerConfig;
use crate::error::MailerError;
use crate::models::{EmailMessage, SendReceipt};

/// Outbound-email seam.
///
/// Held as `Arc<dyn Mailer>` in application state so tests can substitute a
/// recording double for the real provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submit one message. `Ok` means the provider accepted the message for
    /// delivery, nothing more.
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, MailerError>;
}

/// REST client for a Resend-compatible email API.
pub struct HttpMailer {
    http: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, MailerError> {
        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));

        debug!(to = ?message.to, subject = %message.subject, "Submitting email to provider");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        // Acceptance carries an `id`; anything else is an explicit rejection
        // body like {"statusCode":422,"name":"...","message":"..."}.
        match body.get("id").and_then(|id| id.as_str()) {
            Some(id) if status.is_success() => Ok(SendReceipt { id: id.to_string() }),
            _ => {
                let message = body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unrecognized provider response")
                    .to_string();
                Err(MailerError::Provider { message })
            }
        }
    }
}
