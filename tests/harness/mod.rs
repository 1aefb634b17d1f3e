//! Test harness: temporary databases and a scripted HTTP upstream.
#![allow(dead_code)]

pub mod stub_server;
pub mod temp_db;
