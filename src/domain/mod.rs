//! Ledger-agnostic domain types: seeds, identities, endpoints, manifests.

pub mod deployment;
pub mod endpoint;
pub mod identity;
pub mod lifecycle;
pub mod manifest;
pub mod network;
pub mod seed;

pub use deployment::{DeploymentResult, TxMetadata};
pub use endpoint::{EndpointKind, EndpointUris, ServiceEndpointSet};
pub use identity::{Address, Balance, Identity};
pub use lifecycle::LifecycleState;
pub use manifest::{DeploymentManifest, ManifestEndpoints, ManifestTransaction};
pub use network::Network;
pub use seed::{Seed, GENESIS_SEED, SEED_HEX_LEN};
