//! Service endpoint configuration.

use serde::Deserialize;
use url::Url;

use crate::domain::{EndpointUris, Network};
use crate::error::ConfigError;

const LOCAL_INDEXER: &str = "http://127.0.0.1:8088/api/v1/graphql";
const LOCAL_INDEXER_WS: &str = "ws://127.0.0.1:8088/api/v1/graphql/ws";
const LOCAL_NODE: &str = "http://127.0.0.1:9944";
const LOCAL_PROOF_SERVER: &str = "http://127.0.0.1:6300";

/// Endpoint overrides from the `[endpoints]` table.
///
/// The local network falls back to the standard local stack for anything
/// unset; other networks must configure every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointsConfig {
    pub indexer: Option<String>,
    pub indexer_ws: Option<String>,
    pub node: Option<String>,
    pub proof_server: Option<String>,
    /// Funding source base URL. Defaults to the indexer's origin.
    pub funding: Option<String>,
}

impl EndpointsConfig {
    /// Raw endpoint URIs for `network`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for an endpoint that is unset
    /// on a network without defaults.
    pub fn resolve(&self, network: Network) -> Result<EndpointUris, ConfigError> {
        Ok(EndpointUris {
            indexer: pick(&self.indexer, network, LOCAL_INDEXER, "endpoints.indexer")?,
            indexer_ws: pick(&self.indexer_ws, network, LOCAL_INDEXER_WS, "endpoints.indexer_ws")?,
            node: pick(&self.node, network, LOCAL_NODE, "endpoints.node")?,
            proof_server: pick(
                &self.proof_server,
                network,
                LOCAL_PROOF_SERVER,
                "endpoints.proof_server",
            )?,
        })
    }

    /// Funding source URL for `network`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configured funding URL or
    /// the indexer URL it derives from does not parse.
    pub fn funding_url(&self, network: Network) -> Result<Url, ConfigError> {
        if let Some(raw) = &self.funding {
            return Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
                field: "endpoints.funding",
                reason: e.to_string(),
            });
        }

        let indexer = self.resolve(network)?.indexer;
        let url = Url::parse(&indexer).map_err(|e| ConfigError::InvalidValue {
            field: "endpoints.indexer",
            reason: e.to_string(),
        })?;
        Url::parse(&url.origin().ascii_serialization()).map_err(|e| ConfigError::InvalidValue {
            field: "endpoints.funding",
            reason: format!("cannot derive from indexer: {e}"),
        })
    }
}

fn pick(
    value: &Option<String>,
    network: Network,
    local_default: &str,
    field: &'static str,
) -> Result<String, ConfigError> {
    match (value, network) {
        (Some(value), _) => Ok(value.clone()),
        (None, Network::Local) => Ok(local_default.to_string()),
        (None, _) => Err(ConfigError::MissingField { field }),
    }
}
