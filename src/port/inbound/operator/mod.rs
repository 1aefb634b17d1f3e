//! Operator-facing inbound ports consumed by CLI adapters.

pub mod config;
pub mod diagnostic;
pub mod opportunity;
pub mod port;
pub mod runtime;
pub mod user;
