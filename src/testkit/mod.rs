//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`wallet`]: [`ScriptedWallet`], a funding source that replays a
//!   balance script.
//! - [`probe`]: [`ScriptedProbe`], with per-endpoint failure counts.
//! - [`ledger`]: [`ScriptedLedger`], with scripted submit and status results.
//! - [`reporter`]: [`RecordingReporter`], which captures progress events.
//! - [`config`]: canonical plans, endpoints, and fast policies.

pub mod config;
pub mod ledger;
pub mod probe;
pub mod reporter;
pub mod wallet;

pub use crate::adapter::outbound::MemoryPrivateStateStore;
pub use config::{contract, fast_policies, local_uris, plan};
pub use ledger::{ScriptedLedger, ScriptedSubmit};
pub use probe::ScriptedProbe;
pub use reporter::RecordingReporter;
pub use wallet::ScriptedWallet;
