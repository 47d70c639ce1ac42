//! Integration tests

pub mod client;
pub mod realtime;
