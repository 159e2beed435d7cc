//! Contract deployment configuration.

use serde::Deserialize;

use crate::application::ContractSpec;

/// The contract to deploy and where its private state lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_private_state_id")]
    pub private_state_id: String,
    #[serde(default = "default_private_state_path")]
    pub private_state_path: String,
    /// Initial private state handed to the contract on deploy.
    #[serde(default = "default_initial_private_state")]
    pub initial_private_state: serde_json::Value,
}

fn default_name() -> String {
    "age-verification".into()
}

fn default_private_state_id() -> String {
    "ageVerificationPrivateState".into()
}

fn default_private_state_path() -> String {
    "private-state.json".into()
}

fn default_initial_private_state() -> serde_json::Value {
    serde_json::json!({ "privateCounter": 0 })
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            private_state_id: default_private_state_id(),
            private_state_path: default_private_state_path(),
            initial_private_state: default_initial_private_state(),
        }
    }
}

impl ContractConfig {
    #[must_use]
    pub fn spec(&self) -> ContractSpec {
        ContractSpec {
            name: self.name.clone(),
            private_state_id: self.private_state_id.clone(),
        }
    }
}
