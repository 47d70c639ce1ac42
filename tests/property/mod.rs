//! Property-based tests

mod wire_proptest;
