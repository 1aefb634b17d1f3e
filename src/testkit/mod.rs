//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for catalogs, price points, opportunities and
//!   user preferences.
//! - [`price`] - `ScriptedPriceSource`, a [`PriceSource`](crate::port::outbound::price_source::PriceSource)
//!   with queued responses and a health switch.
//! - [`channel`] - `RecordingSender`, a [`ChannelSender`](crate::port::outbound::channel::ChannelSender)
//!   that records deliveries and returns a configurable outcome.
//!
//! In-memory stores live in [`crate::adapter::outbound::memory`].

pub mod channel;
pub mod domain;
pub mod price;
