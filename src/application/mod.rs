//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the scan-and-notify pipeline.

pub mod detector;
pub mod dispatcher;
pub mod eligibility;
pub mod gate;
pub mod message;
pub mod scan;
