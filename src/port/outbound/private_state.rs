//! Local private-state storage port.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Private state kept for a deployed contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateStateEntry {
    pub contract_address: String,
    pub state: serde_json::Value,
}

/// Local store for contract private state, keyed by private-state id.
pub trait PrivateStateStore: Send + Sync {
    fn get(&self, state_id: &str) -> Result<Option<PrivateStateEntry>>;

    fn set(&self, state_id: &str, entry: PrivateStateEntry) -> Result<()>;
}
