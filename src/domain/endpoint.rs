//! Remote service endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PipelineError;

/// The remote services a deployment depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Indexing service query endpoint.
    Indexer,
    /// Indexing service event-stream endpoint.
    IndexerWs,
    /// Ledger node endpoint.
    Node,
    /// Proof-computation endpoint.
    ProofServer,
}

impl EndpointKind {
    /// All endpoint kinds in probe order.
    pub const ALL: [Self; 4] = [Self::Indexer, Self::IndexerWs, Self::Node, Self::ProofServer];

    /// Config-file name of this endpoint.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Indexer => "indexer",
            Self::IndexerWs => "indexer_ws",
            Self::Node => "node",
            Self::ProofServer => "proof_server",
        }
    }

    /// True for the event-stream endpoint, which speaks WebSocket.
    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self, Self::IndexerWs)
    }

    const fn schemes(self) -> &'static [&'static str] {
        if self.is_stream() {
            &["ws", "wss"]
        } else {
            &["http", "https"]
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unvalidated endpoint URIs as they appear in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointUris {
    pub indexer: String,
    pub indexer_ws: String,
    pub node: String,
    pub proof_server: String,
}

impl EndpointUris {
    /// Raw URI configured for `kind`.
    #[must_use]
    pub fn get(&self, kind: EndpointKind) -> &str {
        match kind {
            EndpointKind::Indexer => &self.indexer,
            EndpointKind::IndexerWs => &self.indexer_ws,
            EndpointKind::Node => &self.node,
            EndpointKind::ProofServer => &self.proof_server,
        }
    }
}

/// Validated, immutable set of service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpointSet {
    indexer: Url,
    indexer_ws: Url,
    node: Url,
    proof_server: Url,
}

impl ServiceEndpointSet {
    /// Validate every URI in `uris`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EndpointUnreachable`] naming the first
    /// endpoint that is not a well-formed URI with an acceptable scheme
    /// and host.
    pub fn parse(uris: &EndpointUris) -> Result<Self, PipelineError> {
        Ok(Self {
            indexer: parse_endpoint(EndpointKind::Indexer, &uris.indexer)?,
            indexer_ws: parse_endpoint(EndpointKind::IndexerWs, &uris.indexer_ws)?,
            node: parse_endpoint(EndpointKind::Node, &uris.node)?,
            proof_server: parse_endpoint(EndpointKind::ProofServer, &uris.proof_server)?,
        })
    }

    #[must_use]
    pub fn get(&self, kind: EndpointKind) -> &Url {
        match kind {
            EndpointKind::Indexer => &self.indexer,
            EndpointKind::IndexerWs => &self.indexer_ws,
            EndpointKind::Node => &self.node,
            EndpointKind::ProofServer => &self.proof_server,
        }
    }

    /// Iterate endpoints in probe order.
    pub fn iter(&self) -> impl Iterator<Item = (EndpointKind, &Url)> {
        EndpointKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

fn parse_endpoint(kind: EndpointKind, raw: &str) -> Result<Url, PipelineError> {
    let malformed = |reason: String| PipelineError::EndpointUnreachable {
        endpoint: kind,
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| malformed(format!("malformed URI: {e}")))?;
    if !kind.schemes().contains(&url.scheme()) {
        return Err(malformed(format!(
            "unsupported scheme '{}', expected one of {:?}",
            url.scheme(),
            kind.schemes()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(malformed("URI has no host".to_string()));
    }
    Ok(url)
}
