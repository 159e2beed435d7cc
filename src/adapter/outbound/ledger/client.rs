//! HTTP client for proving and submitting provisioning transactions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::dto::{ErrorResponse, ProveResponse, StatusResponse, SubmitResponse, SubmitTransaction};
use crate::adapter::outbound::http;
use crate::domain::{EndpointKind, ServiceEndpointSet};
use crate::error::{Error, Result};
use crate::port::{DeployRequest, LedgerClient, SubmitOutcome, TxStatus};

/// Proves a deploy request on the proof server, then submits it to the
/// ledger node.
///
/// Outcome classification:
///
/// | Situation | Result |
/// |---|---|
/// | Proof server fails in any way | `Rejected` (nothing reached the node) |
/// | Node answers 2xx with a tx id | `Accepted` |
/// | Node answers 4xx | `Rejected` |
/// | Transport error, 5xx, unreadable reply | `Err` (outcome unknown) |
pub struct HttpLedgerClient {
    http: HttpClient,
}

impl HttpLedgerClient {
    #[must_use]
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            http: http::client(request_timeout),
        }
    }

    async fn prove(
        &self,
        endpoints: &ServiceEndpointSet,
        request: &DeployRequest,
    ) -> Result<serde_json::Value> {
        let url = http::endpoint_url(endpoints.get(EndpointKind::ProofServer), &["prove"])?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let body: ProveResponse = response.json().await?;
        Ok(body.proof)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit(
        &self,
        endpoints: &ServiceEndpointSet,
        request: &DeployRequest,
    ) -> Result<SubmitOutcome> {
        let proof = match self.prove(endpoints, request).await {
            Ok(proof) => proof,
            Err(e) => {
                warn!(error = %e, "Proof generation failed");
                return Ok(SubmitOutcome::Rejected {
                    reason: format!("proof generation failed: {e}"),
                });
            }
        };
        debug!("Proof generated");

        let url = http::endpoint_url(endpoints.get(EndpointKind::Node), &["transactions"])?;
        let body = SubmitTransaction {
            deployer: request.deployer.as_str(),
            contract: &request.contract,
            private_state_id: &request.private_state_id,
            proof,
        };
        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();

        if status.is_client_error() {
            let body: ErrorResponse = response.json().await.unwrap_or_default();
            let reason = body
                .error
                .unwrap_or_else(|| format!("node refused transaction ({status})"));
            return Ok(SubmitOutcome::Rejected { reason });
        }
        if !status.is_success() {
            return Err(Error::Protocol(format!("node returned {status}")));
        }

        let accepted: SubmitResponse = response.json().await?;
        Ok(SubmitOutcome::Accepted {
            tx_id: accepted.tx_id,
        })
    }

    async fn status(&self, endpoints: &ServiceEndpointSet, tx_id: &str) -> Result<TxStatus> {
        let url = http::endpoint_url(endpoints.get(EndpointKind::Node), &["transactions", tx_id])?;
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        let body: StatusResponse = response.json().await?;
        Ok(body.into())
    }
}
