//! CLI module graph.

pub mod check;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod inbox;
pub mod operator;
pub mod opportunities;
pub mod output;
pub mod paths;
pub mod run;
pub mod scan;
pub mod users;
