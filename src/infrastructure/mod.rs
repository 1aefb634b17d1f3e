//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`health`] - Static and live health checks
//! - [`operator`] - Operator port implementations used by the CLI
//! - [`scheduler`] - Background scan loop

pub mod bootstrap;
pub mod config;
pub mod health;
pub mod operator;
pub mod scheduler;
