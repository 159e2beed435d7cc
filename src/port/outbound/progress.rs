//! Progress reporting port.
//!
//! Every pipeline component receives a reporter handle at construction
//! instead of reaching for process-wide state. Production wires
//! [`TracingReporter`]; tests capture events with a recording reporter.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{Balance, EndpointKind, LifecycleState};

/// Structured progress events emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A pipeline stage was entered.
    StageEntered { stage: LifecycleState },
    /// One poll of the funding source. `balance` is `None` when the query
    /// failed.
    FundingPoll {
        attempt: u32,
        balance: Option<Balance>,
        elapsed: Duration,
    },
    /// One reachability probe attempt.
    ProbeAttempt {
        endpoint: EndpointKind,
        attempt: u32,
        max_attempts: u32,
        reachable: bool,
    },
    /// The provisioning transaction was accepted by the node.
    TransactionSubmitted { tx_id: String },
    /// One confirmation status lookup.
    ConfirmationPoll { tx_id: String, attempt: u32 },
    /// The resource was deployed and its address minted.
    Deployed { address: String, tx_id: String },
    /// The manifest reached durable storage.
    ManifestRecorded { path: PathBuf },
    /// A stage failed.
    StageFailed {
        stage: LifecycleState,
        kind: &'static str,
        message: String,
    },
    /// All held resources were released.
    ShutdownCompleted,
}

/// Trait for progress sinks.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `report` is called inline on the pipeline's control flow and must not
///   block
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// A no-op reporter.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// A reporter that logs events via tracing.
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        use tracing::{debug, error, info, warn};
        match event {
            ProgressEvent::StageEntered { stage } => {
                info!(stage = %stage, "Stage entered");
            }
            ProgressEvent::FundingPoll {
                attempt,
                balance: Some(balance),
                elapsed,
            } => {
                info!(
                    attempt,
                    balance = %balance,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Funding poll"
                );
            }
            ProgressEvent::FundingPoll {
                attempt,
                balance: None,
                elapsed,
            } => {
                warn!(
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Funding poll failed"
                );
            }
            ProgressEvent::ProbeAttempt {
                endpoint,
                attempt,
                max_attempts,
                reachable,
            } => {
                if reachable {
                    debug!(endpoint = %endpoint, attempt, max_attempts, "Endpoint reachable");
                } else {
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        max_attempts,
                        "Endpoint probe failed (attempt {attempt} of {max_attempts})"
                    );
                }
            }
            ProgressEvent::TransactionSubmitted { tx_id } => {
                info!(tx_id = %tx_id, "Provisioning transaction submitted");
            }
            ProgressEvent::ConfirmationPoll { tx_id, attempt } => {
                debug!(tx_id = %tx_id, attempt, "Awaiting confirmation");
            }
            ProgressEvent::Deployed { address, tx_id } => {
                info!(address = %address, tx_id = %tx_id, "Contract deployed");
            }
            ProgressEvent::ManifestRecorded { path } => {
                info!(path = %path.display(), "Deployment manifest recorded");
            }
            ProgressEvent::StageFailed {
                stage,
                kind,
                message,
            } => {
                error!(stage = %stage, kind, error = %message, "Stage failed");
            }
            ProgressEvent::ShutdownCompleted => {
                info!("Shutdown complete");
            }
        }
    }
}
