//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without
//! containing deployment logic.
//!
//! # Submodules
//!
//! - [`bootstrap`]: composition root wiring adapters into the orchestrator
//! - [`config`]: configuration loading, validation, and logging setup

pub mod bootstrap;
pub mod config;
