//! Operator implementations for inbound adapters.

pub mod config;
pub mod diagnostic;
pub mod entry;
pub mod opportunity;
pub mod runtime;
pub mod user;

mod shared;
