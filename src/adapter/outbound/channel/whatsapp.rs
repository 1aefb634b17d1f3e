//! WhatsApp delivery through the Meta Graph API using approved templates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::format::{normalize_phone_number, whatsapp_template};
use crate::domain::notification::Channel;
use crate::error::{Error, Result};
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};

pub const ACCESS_TOKEN_ENV: &str = "WHATSAPP_ACCESS_TOKEN";
pub const PHONE_NUMBER_ID_ENV: &str = "WHATSAPP_PHONE_NUMBER_ID";

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsappConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(skip)]
    pub access_token: String,
    #[serde(skip)]
    pub phone_number_id: String,
}

fn default_api_url() -> String {
    "https://graph.facebook.com/v18.0".into()
}

fn default_language() -> String {
    "en_US".into()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl WhatsappConfig {
    /// Fill credentials from the environment. Returns `None` if either is
    /// missing.
    #[must_use]
    pub fn with_env_credentials(mut self) -> Option<Self> {
        self.access_token = std::env::var(ACCESS_TOKEN_ENV).ok()?;
        self.phone_number_id = std::env::var(PHONE_NUMBER_ID_ENV).ok()?;
        Some(self)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.api_url.trim_end_matches('/'),
            self.phone_number_id
        )
    }
}

pub struct WhatsappSender {
    http: HttpClient,
    config: WhatsappConfig,
}

impl WhatsappSender {
    #[must_use]
    pub fn new(config: WhatsappConfig) -> Self {
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
impl ChannelSender for WhatsappSender {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool> {
        let Some(to) = normalize_phone_number(destination) else {
            return Err(Error::Channel(format!(
                "invalid phone number '{destination}', expected 10-15 digits"
            )));
        };

        let template = whatsapp_template(content);
        let parameters: Vec<_> = template
            .parameters
            .iter()
            .map(|text| json!({"type": "text", "text": text}))
            .collect();
        let body = json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "template",
            "template": {
                "name": template.name,
                "language": {"code": self.config.language},
                "components": [{"type": "body", "parameters": parameters}],
            },
        });

        let response = self
            .http
            .post(self.config.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let reply: serde_json::Value = response.json().await.unwrap_or_default();
        if status.is_success() {
            let message_id = reply
                .pointer("/messages/0/id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");
            info!(to = %to, template = template.name, message_id, "WhatsApp message sent");
            return Ok(true);
        }

        let reason = reply
            .pointer("/error/message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("no error detail");
        Err(Error::Channel(format!(
            "WhatsApp API returned HTTP {}: {reason}",
            status.as_u16()
        )))
    }
}
