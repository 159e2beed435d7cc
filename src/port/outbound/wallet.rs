//! Wallet connection port.

use async_trait::async_trait;

use crate::domain::{Address, Balance};
use crate::error::Result;

/// Connection to the wallet backend and its funding source.
///
/// The orchestrator owns exactly one connection per run and closes it on
/// every exit path.
///
/// # Errors
///
/// Methods return [`Result`] for transport failures; a failed balance
/// query is retryable.
#[async_trait]
pub trait WalletConnection: Send + Sync {
    /// Query the spendable balance credited to `address`.
    ///
    /// Idempotent and side-effect free.
    async fn balance(&self, address: &Address) -> Result<Balance>;

    /// Release the connection and any sockets it holds.
    async fn close(&self) -> Result<()>;
}
