//! Email delivery through an HTTP mail relay.
//!
//! The relay receives `{from, to, subject, text, html}` as JSON with a
//! bearer key and answers 2xx on acceptance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::format::email_html;
use crate::domain::notification::Channel;
use crate::error::{Error, Result};
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};

/// Environment variable holding the relay API key.
pub const MAIL_API_KEY_ENV: &str = "MAIL_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub relay_url: String,
    pub from_address: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl EmailConfig {
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        self.api_key = std::env::var(MAIL_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        self
    }
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: String,
}

pub struct EmailSender {
    http: HttpClient,
    config: EmailConfig,
}

impl EmailSender {
    #[must_use]
    pub fn new(config: EmailConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http, config }
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool> {
        if !destination.contains('@') {
            return Err(Error::Channel(format!("invalid email address '{destination}'")));
        }

        let message = RelayMessage {
            from: &self.config.from_address,
            to: [destination],
            subject: &content.title,
            text: &content.message,
            html: email_html(content),
        };

        let mut request = self.http.post(&self.config.relay_url).json(&message);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            info!(to = destination, "Email notification sent");
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            Err(Error::Channel(format!(
                "mail relay returned HTTP {}: {snippet}",
                status.as_u16()
            )))
        }
    }
}
