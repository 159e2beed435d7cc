//! Ledger submission port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Address, ServiceEndpointSet};
use crate::error::Result;

/// Provisioning request handed to the proof server and ledger node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Address paying for the deployment.
    pub deployer: Address,
    /// Name of the compiled contract the proof server knows about.
    pub contract: String,
    pub private_state_id: String,
    pub initial_private_state: serde_json::Value,
}

/// Result of handing a transaction to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The node accepted the transaction for inclusion.
    Accepted { tx_id: String },
    /// The remote side explicitly refused; nothing was provisioned.
    Rejected { reason: String },
}

/// Inclusion status of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed {
        contract_address: String,
        block_height: Option<u64>,
    },
    Rejected {
        reason: String,
    },
}

/// Port for submitting provisioning transactions.
///
/// # Errors
///
/// An `Err` from [`submit`](LedgerClient::submit) means the outcome is
/// unknown: the transaction may or may not have reached the ledger.
/// Explicit refusals are reported as [`SubmitOutcome::Rejected`] instead.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Prove and submit a provisioning transaction. Called at most once
    /// per deployment.
    async fn submit(
        &self,
        endpoints: &ServiceEndpointSet,
        request: &DeployRequest,
    ) -> Result<SubmitOutcome>;

    /// Look up the inclusion status of a submitted transaction.
    async fn status(&self, endpoints: &ServiceEndpointSet, tx_id: &str) -> Result<TxStatus>;
}
