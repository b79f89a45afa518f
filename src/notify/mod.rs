//! Outbound email notification
//!
//! The mail provider is an external collaborator reached over HTTP. The
//! trait keeps the session layer independent of the transport; tests and
//! unconfigured environments use [`NoopNotifier`].

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Mail dispatch failed: {0}")]
    Dispatch(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Dispatch(e.to_string())
    }
}

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Notifier that POSTs messages to a mail API endpoint
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpEmailNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmailNotifier for HttpEmailNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&MailPayload {
                from: &self.config.from_address,
                to,
                subject,
                text: body,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Dispatch(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

/// Notifier that drops messages; used in tests and when no mail API is
/// configured.
pub struct NoopNotifier;

#[async_trait]
impl EmailNotifier for NoopNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::debug!(to = %to, subject = %subject, "Mail notifier not configured, skipping send");
        Ok(())
    }
}
