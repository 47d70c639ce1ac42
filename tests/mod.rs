//! Test suite for xfchat
//!
//! - `common` - Live test server, auth helpers and assertion macros
//! - `integration` - HTTP API, realtime presence and client session tests
//! - `property` - Property-based tests for the registry and wire types

#[macro_use]
pub mod common;
pub mod integration;
pub mod property;
