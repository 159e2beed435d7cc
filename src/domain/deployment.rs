//! Outcome of a confirmed provisioning transaction.

/// Transaction details returned by the ledger on confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxMetadata {
    pub tx_id: String,
    pub block_height: Option<u64>,
}

/// A confirmed deployment.
///
/// `address` is minted by the ledger; nothing else in the crate invents one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub address: String,
    pub tx: TxMetadata,
}
