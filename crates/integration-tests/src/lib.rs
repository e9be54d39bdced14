//! Shared fixtures for simrig integration tests.

#![deny(clippy::unwrap_used)]

pub mod fixtures;
