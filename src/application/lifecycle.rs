//! Observable lifecycle state machine.

use tokio::sync::watch;
use tracing::debug;

use crate::domain::LifecycleState;
use crate::error::LifecycleError;

/// Single lifecycle instance for a run.
///
/// Observers get a `watch` receiver and see every transition without
/// blocking the pipeline.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self { state }
    }

    #[must_use]
    pub fn current(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the move would revisit or skip back to
    /// an earlier state, or leave `Failed`.
    pub fn advance(&self, next: LifecycleState) -> Result<(), LifecycleError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|current| {
            if current.can_transition_to(next) {
                debug!(from = %current, to = %next, "Lifecycle transition");
                *current = next;
                true
            } else {
                outcome = Err(LifecycleError {
                    from: *current,
                    to: next,
                });
                false
            }
        });
        outcome
    }

    /// Mark the run as failed. Idempotent.
    pub fn fail(&self) {
        let _ = self.advance(LifecycleState::Failed);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
