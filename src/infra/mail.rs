//! Notifier implementations.
//!
//! [`RelayNotifier`] hands messages to an HTTP mail relay that owns SMTP and
//! provider credentials. [`LogNotifier`] only records the message and is used
//! when no relay is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, info};

use crate::application::notify::{Notification, Notifier, NotifyError};

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: Url,
    pub api_token: Option<String>,
    pub from: String,
    pub to: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

#[derive(Clone, Debug)]
pub struct RelayNotifier {
    client: Client,
    config: RelayConfig,
}

impl RelayNotifier {
    pub fn new(config: RelayConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|err| NotifyError::Misconfigured(err.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for RelayNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), NotifyError> {
        let to = notification
            .recipient_override
            .as_deref()
            .unwrap_or(&self.config.to);
        let message = RelayMessage {
            from: &self.config.from,
            to,
            subject: &notification.subject,
            text: &notification.text_body,
            html: notification.html_body.as_deref(),
        };

        let mut request = self.client.post(self.config.url.clone()).json(&message);
        if let Some(token) = self.config.api_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            target = "folio::mail",
            subject = %notification.subject,
            status = status.as_u16(),
            "notification relayed"
        );
        Ok(())
    }
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            target = "folio::mail",
            subject = %notification.subject,
            body = %notification.text_body,
            "mail relay not configured; notification logged only"
        );
        Ok(())
    }
}
