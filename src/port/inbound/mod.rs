//! Inbound ports driven by operator-facing adapters.

pub mod operator;
