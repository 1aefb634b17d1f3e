//! Recording [`ChannelSender`] for dispatcher tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::notification::Channel;
use crate::error::{Error, Result};
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};

/// What the sender answers on each call.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    Delivered,
    Declined,
    Fails(String),
}

/// A sender that records every call and returns a fixed outcome.
pub struct RecordingSender {
    channel: Channel,
    outcome: Mutex<SendOutcome>,
    sent: Mutex<Vec<(String, RenderedNotification)>>,
}

impl RecordingSender {
    pub fn new(channel: Channel, outcome: SendOutcome) -> Self {
        Self {
            channel,
            outcome: Mutex::new(outcome),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn delivering(channel: Channel) -> Self {
        Self::new(channel, SendOutcome::Delivered)
    }

    pub fn failing(channel: Channel, reason: &str) -> Self {
        Self::new(channel, SendOutcome::Fails(reason.to_string()))
    }

    pub fn set_outcome(&self, outcome: SendOutcome) {
        *self.outcome.lock() = outcome;
    }

    /// `(destination, content)` for every call, in order.
    pub fn sent(&self) -> Vec<(String, RenderedNotification)> {
        self.sent.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl ChannelSender for RecordingSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(&self, destination: &str, content: &RenderedNotification) -> Result<bool> {
        self.sent
            .lock()
            .push((destination.to_string(), content.clone()));
        match self.outcome.lock().clone() {
            SendOutcome::Delivered => Ok(true),
            SendOutcome::Declined => Ok(false),
            SendOutcome::Fails(reason) => Err(Error::Channel(reason)),
        }
    }
}
