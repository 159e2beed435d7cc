//! The durable record of a completed deployment.
//!
//! Readers such as the verification UI discover the deployed resource
//! through this file, so the JSON shape is part of the public interface:
//!
//! ```json
//! {
//!   "resourceAddress": "0200...",
//!   "deployedAt": "2026-01-15T10:30:00Z",
//!   "network": "local",
//!   "endpoints": {
//!     "indexer": "http://127.0.0.1:8088/api/v1/graphql",
//!     "indexerWs": "ws://127.0.0.1:8088/api/v1/graphql/ws",
//!     "node": "http://127.0.0.1:9944/",
//!     "proofServer": "http://127.0.0.1:6300/"
//!   },
//!   "transaction": { "id": "...", "blockHeight": 42 }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deployment::DeploymentResult;
use super::endpoint::{EndpointKind, ServiceEndpointSet};
use super::network::Network;

/// Deployment manifest written once per successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentManifest {
    /// Address of the deployed resource, as minted by the ledger.
    pub resource_address: String,
    /// When the deployment was confirmed.
    pub deployed_at: DateTime<Utc>,
    pub network: Network,
    /// Endpoints the deployment was made through.
    pub endpoints: ManifestEndpoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<ManifestTransaction>,
}

/// Endpoint snapshot stored in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEndpoints {
    pub indexer: String,
    pub indexer_ws: String,
    pub node: String,
    pub proof_server: String,
}

/// Provisioning transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestTransaction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl DeploymentManifest {
    /// Build the manifest for a confirmed deployment.
    #[must_use]
    pub fn new(
        result: &DeploymentResult,
        network: Network,
        endpoints: &ServiceEndpointSet,
        deployed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_address: result.address.clone(),
            deployed_at,
            network,
            endpoints: ManifestEndpoints::from(endpoints),
            transaction: Some(ManifestTransaction {
                id: result.tx.tx_id.clone(),
                block_height: result.tx.block_height,
            }),
        }
    }
}

impl From<&ServiceEndpointSet> for ManifestEndpoints {
    fn from(set: &ServiceEndpointSet) -> Self {
        Self {
            indexer: set.get(EndpointKind::Indexer).to_string(),
            indexer_ws: set.get(EndpointKind::IndexerWs).to_string(),
            node: set.get(EndpointKind::Node).to_string(),
            proof_server: set.get(EndpointKind::ProofServer).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deployment::TxMetadata;
    use crate::domain::endpoint::EndpointUris;

    fn endpoints() -> ServiceEndpointSet {
        ServiceEndpointSet::parse(&EndpointUris {
            indexer: "http://127.0.0.1:8088/api/v1/graphql".into(),
            indexer_ws: "ws://127.0.0.1:8088/api/v1/graphql/ws".into(),
            node: "http://127.0.0.1:9944".into(),
            proof_server: "http://127.0.0.1:6300".into(),
        })
        .unwrap()
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let result = DeploymentResult {
            address: "0200feed".into(),
            tx: TxMetadata {
                tx_id: "tx-1".into(),
                block_height: Some(42),
            },
        };
        let manifest = DeploymentManifest::new(&result, Network::Local, &endpoints(), Utc::now());
        let json = serde_json::to_string_pretty(&manifest).unwrap();

        assert!(json.contains("\"resourceAddress\": \"0200feed\""));
        assert!(json.contains("\"deployedAt\""));
        assert!(json.contains("\"network\": \"local\""));
        assert!(json.contains("\"indexerWs\""));
        assert!(json.contains("\"proofServer\""));
        assert!(json.contains("\"blockHeight\": 42"));
    }

    #[test]
    fn deserializes_without_transaction() {
        let json = r#"{
            "resourceAddress": "0200abcd",
            "deployedAt": "2026-01-15T10:30:00Z",
            "network": "testnet",
            "endpoints": {
                "indexer": "https://indexer.example/api/v1/graphql",
                "indexerWs": "wss://indexer.example/api/v1/graphql/ws",
                "node": "https://rpc.example/",
                "proofServer": "http://127.0.0.1:6300/"
            }
        }"#;

        let manifest: DeploymentManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.resource_address, "0200abcd");
        assert_eq!(manifest.network, Network::Testnet);
        assert!(manifest.transaction.is_none());
        assert_eq!(manifest.deployed_at.to_rfc3339(), "2026-01-15T10:30:00+00:00");
    }
}
