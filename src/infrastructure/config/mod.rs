//! Infrastructure configuration modules.

pub mod catalog;
pub mod logging;
pub mod settings;
