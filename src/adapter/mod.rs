//! Adapters: concrete implementations of ports, plus the CLI entry side.

pub mod inbound;
pub mod outbound;
