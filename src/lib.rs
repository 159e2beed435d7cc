//! deployctl - bootstrap a funded wallet, deploy a contract, record the result.
//!
//! A single run drives one contract deployment through five stages:
//!
//! 1. **Bootstrap** - derive the wallet identity from a seed and wait until
//!    the funding source credits it
//! 2. **Configure** - validate and probe the indexer, node, and proof server
//! 3. **Deploy** - submit the provisioning transaction exactly once and wait
//!    for the ledger to confirm it
//! 4. **Record** - write the deployment manifest atomically
//! 5. **Serve** - stay up until interrupted, then release the wallet
//!
//! # Modules
//!
//! - [`domain`] - Seeds, identities, endpoints, lifecycle, manifests
//! - [`port`] - Traits for the wallet, probe, ledger, and private state
//! - [`application`] - The pipeline stages and the orchestrator
//! - [`adapter`] - HTTP/WebSocket adapters and the CLI
//! - [`infrastructure`] - Configuration and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use deployctl::infrastructure::bootstrap::build_orchestrator;
//! use deployctl::infrastructure::config::settings::Config;
//! use deployctl::port::TracingReporter;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("deployctl.toml")?;
//! let orchestrator = build_orchestrator(&config, Arc::new(TracingReporter))?;
//! let deployment = orchestrator
//!     .run(&config.plan()?, |d| println!("deployed at {}", d.result.address))
//!     .await?;
//! # let _ = deployment;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
