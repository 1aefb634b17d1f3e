use async_trait::async_trait;
use tracing::debug;

use crate::domain::notification::Channel;
use crate::error::Result;
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};

/// In-app delivery: the stored notification record is the message, so
/// sending always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct InAppSender;

#[async_trait]
impl ChannelSender for InAppSender {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool> {
        debug!(user = destination, title = %content.title, "In-app notification stored");
        Ok(true)
    }
}
