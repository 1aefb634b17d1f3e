//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the opportunity, notification
//! and user stores using Diesel ORM.

mod codec;
pub mod database;
pub mod notification;
pub mod opportunity;
pub mod user;
