//! Notification delivery port.

use async_trait::async_trait;

use crate::domain::notification::{Channel, NotificationType};
use crate::error::Result;

/// Channel-agnostic notification content.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
}

/// Delivers a rendered notification to one destination on one channel.
///
/// `Ok(false)` means the channel declined or could not deliver without a
/// transport error; `Err` carries the failure reason. Both are recorded as
/// failed deliveries.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    fn channel(&self) -> Channel;

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool>;
}
