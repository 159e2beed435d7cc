//! Provisioning transaction submission and confirmation.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cancel;
use super::configure::ProviderBundle;
use super::policy::ConfirmationPolicy;
use crate::domain::{DeploymentResult, LifecycleState, ServiceEndpointSet, TxMetadata};
use crate::error::{Error, PipelineError, Result};
use crate::port::{
    DeployRequest, LedgerClient, PrivateStateEntry, ProgressEvent, ProgressReporter,
    SubmitOutcome, TxStatus,
};

/// The contract being provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSpec {
    /// Name the proof server knows the compiled contract by.
    pub name: String,
    /// Key the contract's private state is stored under.
    pub private_state_id: String,
}

/// Submits exactly one provisioning transaction and waits for it.
///
/// Submission is never retried here. A rejected deployment definitely did
/// not happen; an unconfirmed one may have, and resubmitting could
/// provision a second resource.
pub struct ContractDeployer {
    ledger: Arc<dyn LedgerClient>,
    contract: ContractSpec,
    policy: ConfirmationPolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl ContractDeployer {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        contract: ContractSpec,
        policy: ConfirmationPolicy,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            ledger,
            contract,
            policy,
            reporter,
        }
    }

    /// Deploy the contract and return the ledger-minted address.
    ///
    /// On confirmation the initial private state is stored under the
    /// configured private-state id. A failure to store it is logged and
    /// does not undo the deployment.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::DeploymentRejected`] when the remote side refused
    ///   the transaction.
    /// - [`PipelineError::DeploymentUnconfirmed`] when submission failed in
    ///   transit or confirmation did not arrive in time.
    /// - [`PipelineError::Interrupted`] when `cancel` fires.
    pub async fn deploy(
        &self,
        bundle: ProviderBundle,
        initial_private_state: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<DeploymentResult> {
        let request = DeployRequest {
            deployer: bundle.identity().address().clone(),
            contract: self.contract.name.clone(),
            private_state_id: self.contract.private_state_id.clone(),
            initial_private_state: initial_private_state.clone(),
        };

        info!(contract = %request.contract, deployer = %request.deployer, "Submitting provisioning transaction");
        let submitted = cancel::until_cancelled(
            cancel,
            LifecycleState::Deploying,
            self.ledger.submit(bundle.endpoints(), &request),
        )
        .await
        .map_err(|e| {
            warn!("Interrupted during submission; transaction outcome unknown");
            e
        })?;

        let tx_id = match submitted {
            Ok(SubmitOutcome::Accepted { tx_id }) => tx_id,
            Ok(SubmitOutcome::Rejected { reason }) => {
                return Err(PipelineError::DeploymentRejected { reason }.into());
            }
            Err(e) => {
                return Err(PipelineError::DeploymentUnconfirmed {
                    tx_id: None,
                    reason: format!("submission failed in transit: {e}"),
                }
                .into());
            }
        };
        self.reporter.report(ProgressEvent::TransactionSubmitted {
            tx_id: tx_id.clone(),
        });

        let (address, block_height) = self
            .await_confirmation(bundle.endpoints(), &tx_id, cancel)
            .await?;

        let entry = PrivateStateEntry {
            contract_address: address.clone(),
            state: initial_private_state,
        };
        if let Err(e) = bundle
            .private_state()
            .set(&self.contract.private_state_id, entry)
        {
            warn!(
                address = %address,
                state_id = %self.contract.private_state_id,
                error = %e,
                "Failed to store initial private state"
            );
        }

        self.reporter.report(ProgressEvent::Deployed {
            address: address.clone(),
            tx_id: tx_id.clone(),
        });

        Ok(DeploymentResult {
            address,
            tx: TxMetadata {
                tx_id,
                block_height,
            },
        })
    }

    /// Poll the node until `tx_id` is confirmed, rejected, or the
    /// confirmation timeout passes. Status lookups are reads, so their
    /// failures are tolerated until then.
    async fn await_confirmation(
        &self,
        endpoints: &ServiceEndpointSet,
        tx_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(String, Option<u64>)> {
        let stage = LifecycleState::Deploying;
        let deadline = cancel::deadline_after(Instant::now(), self.policy.timeout);
        let mut attempt: u32 = 0;
        let mut last_error: Option<String> = None;

        loop {
            attempt += 1;
            self.reporter.report(ProgressEvent::ConfirmationPoll {
                tx_id: tx_id.to_string(),
                attempt,
            });

            let lookup = tokio::time::timeout_at(deadline, self.ledger.status(endpoints, tx_id));
            let polled = match cancel::until_cancelled(cancel, stage, lookup).await {
                Ok(polled) => polled,
                Err(e) => {
                    warn!(tx_id, "Interrupted while awaiting confirmation");
                    return Err(e);
                }
            };

            match polled {
                Ok(Ok(TxStatus::Confirmed {
                    contract_address,
                    block_height,
                })) => {
                    info!(tx_id, address = %contract_address, ?block_height, "Transaction confirmed");
                    return Ok((contract_address, block_height));
                }
                Ok(Ok(TxStatus::Rejected { reason })) => {
                    return Err(PipelineError::DeploymentRejected { reason }.into());
                }
                Ok(Ok(TxStatus::Pending)) => debug!(tx_id, attempt, "Transaction pending"),
                Ok(Err(e)) => {
                    debug!(tx_id, attempt, error = %e, "Status lookup failed");
                    last_error = Some(e.to_string());
                }
                Err(_) => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(unconfirmed(tx_id, self.policy.timeout, last_error));
            }
            cancel::sleep(cancel, stage, self.policy.poll_interval.min(deadline - now))
                .await
                .map_err(|e| {
                    warn!(tx_id, "Interrupted while awaiting confirmation");
                    e
                })?;
        }
    }
}

fn unconfirmed(tx_id: &str, timeout: std::time::Duration, last_error: Option<String>) -> Error {
    let mut reason = format!("not confirmed within {}s", timeout.as_secs());
    if let Some(e) = last_error {
        reason.push_str(&format!(" (last status error: {e})"));
    }
    PipelineError::DeploymentUnconfirmed {
        tx_id: Some(tx_id.to_string()),
        reason,
    }
    .into()
}
