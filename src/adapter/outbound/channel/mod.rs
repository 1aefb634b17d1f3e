//! Notification channel senders.
//!
//! Each sender implements [`ChannelSender`](crate::port::outbound::channel::ChannelSender)
//! for one [`Channel`](crate::domain::notification::Channel).

pub mod email;
pub mod format;
pub mod in_app;
#[cfg(feature = "telegram")]
pub mod telegram;
pub mod whatsapp;
