//! Identity derivation and the funding wait.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backoff::Backoff;
use super::cancel;
use super::policy::FundingPolicy;
use crate::domain::{Balance, Identity, LifecycleState, Seed};
use crate::error::{PipelineError, Result};
use crate::port::{ProgressEvent, ProgressReporter, WalletConnection};

/// Turns a seed into a funded identity.
pub struct WalletBootstrapper {
    wallet: Arc<dyn WalletConnection>,
    policy: FundingPolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl WalletBootstrapper {
    pub fn new(
        wallet: Arc<dyn WalletConnection>,
        policy: FundingPolicy,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            wallet,
            policy,
            reporter,
        }
    }

    /// Validate `seed` and derive the identity it controls.
    ///
    /// Performs no I/O, so a malformed seed fails before any remote
    /// service is contacted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidSeed`] when the seed is not exactly
    /// 64 hex characters.
    pub fn bootstrap(&self, seed: &str) -> Result<Identity> {
        let seed = Seed::parse(seed)?;
        let identity = Identity::from_seed(seed);
        info!(address = %identity.address(), "Identity derived");
        Ok(identity)
    }

    /// Poll the funding source until the balance reaches `min_balance`.
    ///
    /// Sleeps are clamped to the time left before the deadline and each
    /// balance query is bounded by the deadline plus the current interval,
    /// so this returns within `timeout` plus one poll interval.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::FundingTimeout`] when the deadline passes after at
    ///   least one successful poll.
    /// - [`PipelineError::FundingSourceUnavailable`] when the source fails
    ///   `max_consecutive_failures` polls in a row, or never answered before
    ///   the deadline.
    /// - [`PipelineError::Interrupted`] when `cancel` fires.
    pub async fn await_funds(
        &self,
        identity: Identity,
        min_balance: Balance,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Identity> {
        let stage = LifecycleState::AwaitingFunds;
        let started = Instant::now();
        let deadline = cancel::deadline_after(started, timeout);
        let mut backoff = Backoff::new(&self.policy);

        let mut attempt: u32 = 0;
        let mut consecutive_failures: u32 = 0;
        let mut last_balance: Option<Balance> = None;
        let mut last_error = String::from("no response before deadline");

        info!(
            address = %identity.address(),
            min_balance = %min_balance,
            timeout_secs = timeout.as_secs(),
            "Waiting for funds"
        );

        loop {
            attempt += 1;
            let delay = backoff.next_delay();

            let query = self.wallet.balance(identity.address());
            let polled = cancel::until_cancelled(
                cancel,
                stage,
                tokio::time::timeout_at(cancel::deadline_after(deadline, delay), query),
            )
            .await?;

            let outcome = match polled {
                Ok(Ok(balance)) => Ok(balance),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err("balance query timed out".to_string()),
            };

            match outcome {
                Ok(balance) => {
                    consecutive_failures = 0;
                    last_balance = Some(balance);
                    self.reporter.report(ProgressEvent::FundingPoll {
                        attempt,
                        balance: Some(balance),
                        elapsed: started.elapsed(),
                    });
                    if balance >= min_balance {
                        info!(attempt, balance = %balance, "Wallet funded");
                        return Ok(identity.with_balance(balance));
                    }
                    debug!(attempt, balance = %balance, min_balance = %min_balance, "Balance below minimum");
                }
                Err(reason) => {
                    consecutive_failures += 1;
                    self.reporter.report(ProgressEvent::FundingPoll {
                        attempt,
                        balance: None,
                        elapsed: started.elapsed(),
                    });
                    warn!(attempt, consecutive_failures, error = %reason, "Balance query failed");
                    if consecutive_failures >= self.policy.max_consecutive_failures {
                        return Err(PipelineError::FundingSourceUnavailable {
                            attempts: consecutive_failures,
                            reason,
                        }
                        .into());
                    }
                    last_error = reason;
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(match last_balance {
                    Some(last_balance) => PipelineError::FundingTimeout {
                        address: identity.address().to_string(),
                        waited: now - started,
                        last_balance,
                    },
                    None => PipelineError::FundingSourceUnavailable {
                        attempts: attempt,
                        reason: last_error,
                    },
                }
                .into());
            }

            cancel::sleep(cancel, stage, delay.min(deadline - now)).await?;
        }
    }
}
