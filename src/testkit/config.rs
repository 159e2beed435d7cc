//! Canonical test configurations.
//!
//! Single source of truth for plans and policies used across tests.
//! Policies here keep every wait in the millisecond range.

use std::path::Path;
use std::time::Duration;

use crate::application::{
    ConfirmationPolicy, ContractSpec, DeploymentPlan, FundingPolicy, Policies, ProbePolicy,
};
use crate::domain::{EndpointUris, Network, GENESIS_SEED};

/// Well-formed endpoints for the local network.
pub fn local_uris() -> EndpointUris {
    EndpointUris {
        indexer: "http://127.0.0.1:8088/api/v1/graphql".into(),
        indexer_ws: "ws://127.0.0.1:8088/api/v1/graphql/ws".into(),
        node: "http://127.0.0.1:9944".into(),
        proof_server: "http://127.0.0.1:6300".into(),
    }
}

/// Policies with short fixed intervals and no jitter.
pub fn fast_policies() -> Policies {
    Policies {
        funding: FundingPolicy::fixed(Duration::from_millis(100)),
        probe: ProbePolicy {
            attempts: 3,
            delay: Duration::from_millis(10),
        },
        confirmation: ConfirmationPolicy {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        },
        ..Policies::default()
    }
}

pub fn contract() -> ContractSpec {
    ContractSpec {
        name: "age-verification".into(),
        private_state_id: "ageVerificationPrivateState".into(),
    }
}

/// Plan deploying with the genesis seed and writing to `manifest_path`.
pub fn plan(manifest_path: &Path) -> DeploymentPlan {
    DeploymentPlan {
        seed: GENESIS_SEED.into(),
        network: Network::Local,
        endpoints: local_uris(),
        min_balance: 1,
        funding_timeout: Duration::from_secs(5),
        initial_private_state: serde_json::json!({ "privateCounter": 0 }),
        manifest_path: manifest_path.to_path_buf(),
    }
}
