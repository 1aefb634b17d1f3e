//! CoinGecko market-data adapter.

pub mod client;
mod dto;
pub mod rate_limit;
pub mod settings;
