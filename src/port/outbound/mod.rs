//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the market-data
//! API, persistence, and notification delivery channels.

pub mod channel;
pub mod price_source;
pub mod store;
