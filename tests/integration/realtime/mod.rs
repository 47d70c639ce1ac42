//! Realtime presence tests against a live listener

#[cfg(feature = "ssr")]
mod presence_test;
