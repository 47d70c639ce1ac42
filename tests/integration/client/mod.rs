//! Client session adapter tests against a live server

#[cfg(feature = "ssr")]
mod session_test;
