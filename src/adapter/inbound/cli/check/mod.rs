//! Configuration and connection diagnostics.

pub mod config;
pub mod connection;
