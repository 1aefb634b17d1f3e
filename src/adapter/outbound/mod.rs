//! Outbound adapters (driven side): implementations of outbound ports.

pub mod channel;
pub mod coingecko;
pub mod memory;
pub mod sqlite;
