//! Endpoint validation and provider assembly.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use super::cancel;
use super::policy::ProbePolicy;
use crate::domain::{EndpointKind, EndpointUris, Identity, LifecycleState, ServiceEndpointSet};
use crate::error::{Error, PipelineError, Result};
use crate::port::{EndpointProbe, PrivateStateStore, ProgressEvent, ProgressReporter};

/// Everything the deployer needs, assembled once per run.
pub struct ProviderBundle {
    identity: Identity,
    endpoints: ServiceEndpointSet,
    private_state: Arc<dyn PrivateStateStore>,
}

impl ProviderBundle {
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn endpoints(&self) -> &ServiceEndpointSet {
        &self.endpoints
    }

    #[must_use]
    pub fn private_state(&self) -> &dyn PrivateStateStore {
        self.private_state.as_ref()
    }
}

impl std::fmt::Debug for ProviderBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBundle")
            .field("address", self.identity.address())
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// Outcome of probing one endpoint for `check connection`.
#[derive(Debug, Clone)]
pub struct EndpointCheck {
    pub endpoint: EndpointKind,
    pub url: Url,
    pub attempts: u32,
    /// `None` when reachable, otherwise the last failure.
    pub error: Option<String>,
}

impl EndpointCheck {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.error.is_none()
    }
}

/// Validates endpoints and probes their reachability.
pub struct ProviderConfigurator {
    probe: Arc<dyn EndpointProbe>,
    policy: ProbePolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl ProviderConfigurator {
    pub fn new(
        probe: Arc<dyn EndpointProbe>,
        policy: ProbePolicy,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            probe,
            policy,
            reporter,
        }
    }

    /// Validate `uris`, probe every endpoint, and assemble the bundle.
    ///
    /// All URIs are validated before the first probe, so a malformed
    /// endpoint fails without any network traffic.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EndpointUnreachable`] naming the endpoint
    /// that was malformed or failed every probe attempt, or
    /// [`PipelineError::Interrupted`] when `cancel` fires.
    pub async fn configure(
        &self,
        identity: Identity,
        uris: &EndpointUris,
        private_state: Arc<dyn PrivateStateStore>,
        cancel: &CancellationToken,
    ) -> Result<ProviderBundle> {
        let endpoints = ServiceEndpointSet::parse(uris)?;

        for (kind, url) in endpoints.iter() {
            self.probe_with_retry(kind, url, cancel).await?;
        }
        info!("All endpoints reachable");

        Ok(ProviderBundle {
            identity,
            endpoints,
            private_state,
        })
    }

    /// Probe every endpoint without failing fast, for diagnostics.
    ///
    /// # Errors
    ///
    /// Only [`PipelineError::Interrupted`] is returned as an error;
    /// unreachable endpoints are reported in the result.
    pub async fn check(
        &self,
        endpoints: &ServiceEndpointSet,
        cancel: &CancellationToken,
    ) -> Result<Vec<EndpointCheck>> {
        let mut checks = Vec::with_capacity(EndpointKind::ALL.len());
        for (kind, url) in endpoints.iter() {
            let (attempts, error) = match self.attempt(kind, url, cancel).await {
                Ok(attempts) => (attempts, None),
                Err((_, Error::Pipeline(e @ PipelineError::Interrupted { .. }))) => {
                    return Err(e.into());
                }
                Err((attempts, e)) => (attempts, Some(e.to_string())),
            };
            checks.push(EndpointCheck {
                endpoint: kind,
                url: url.clone(),
                attempts,
                error,
            });
        }
        Ok(checks)
    }

    async fn probe_with_retry(
        &self,
        kind: EndpointKind,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match self.attempt(kind, url, cancel).await {
            Ok(_) => Ok(()),
            Err((_, e @ Error::Pipeline(PipelineError::Interrupted { .. }))) => Err(e),
            Err((attempts, e)) => Err(PipelineError::EndpointUnreachable {
                endpoint: kind,
                url: url.to_string(),
                reason: format!("{e} (after {attempts} attempts)"),
            }
            .into()),
        }
    }

    /// Run up to `policy.attempts` probes, returning the attempt count
    /// alongside the outcome.
    async fn attempt(
        &self,
        kind: EndpointKind,
        url: &Url,
        cancel: &CancellationToken,
    ) -> std::result::Result<u32, (u32, Error)> {
        let stage = LifecycleState::ConfiguringProviders;
        let max_attempts = self.policy.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = cancel::until_cancelled(cancel, stage, self.probe.probe(kind, url))
                .await
                .map_err(|e| (attempt, e))?;

            self.reporter.report(ProgressEvent::ProbeAttempt {
                endpoint: kind,
                attempt,
                max_attempts,
                reachable: outcome.is_ok(),
            });

            match outcome {
                Ok(()) => return Ok(attempt),
                Err(e) if attempt >= max_attempts => return Err((attempt, e)),
                Err(e) => {
                    warn!(
                        endpoint = %kind,
                        url = %url,
                        error = %e,
                        "Probe failed, retrying (attempt {attempt} of {max_attempts})"
                    );
                    cancel::sleep(cancel, stage, self.policy.delay)
                        .await
                        .map_err(|e| (attempt, e))?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::GENESIS_SEED;
    use crate::testkit::{local_uris, MemoryPrivateStateStore, RecordingReporter, ScriptedProbe};

    fn identity() -> Identity {
        Identity::from_seed(crate::domain::Seed::parse(GENESIS_SEED).unwrap())
    }

    fn configurator(probe: Arc<ScriptedProbe>) -> ProviderConfigurator {
        ProviderConfigurator::new(
            probe,
            ProbePolicy {
                attempts: 3,
                delay: Duration::from_millis(10),
            },
            Arc::new(RecordingReporter::new()),
        )
    }

    #[tokio::test]
    async fn malformed_endpoint_is_named_and_nothing_probed() {
        let probe = Arc::new(ScriptedProbe::reachable());
        let mut uris = local_uris();
        uris.proof_server = "not a uri".into();

        let err = configurator(probe.clone())
            .configure(
                identity(),
                &uris,
                Arc::new(MemoryPrivateStateStore::new()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            Error::Pipeline(PipelineError::EndpointUnreachable { endpoint, .. }) => {
                assert_eq!(endpoint, EndpointKind::ProofServer);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_recovers_within_attempts() {
        let probe = Arc::new(ScriptedProbe::reachable().failing_first(EndpointKind::Node, 2));

        let bundle = configurator(probe.clone())
            .configure(
                identity(),
                &local_uris(),
                Arc::new(MemoryPrivateStateStore::new()),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(bundle.endpoints().get(EndpointKind::Node).scheme(), "http");
        assert_eq!(probe.calls_for(EndpointKind::Node), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn check_reports_every_endpoint() {
        let probe = Arc::new(ScriptedProbe::reachable().failing_first(EndpointKind::IndexerWs, u32::MAX));
        let endpoints = ServiceEndpointSet::parse(&local_uris()).unwrap();

        let checks = configurator(probe)
            .check(&endpoints, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(checks.len(), 4);
        let ws = checks
            .iter()
            .find(|c| c.endpoint == EndpointKind::IndexerWs)
            .unwrap();
        assert!(!ws.is_reachable());
        assert_eq!(ws.attempts, 3);
        assert!(checks
            .iter()
            .filter(|c| c.endpoint != EndpointKind::IndexerWs)
            .all(EndpointCheck::is_reachable));
    }
}
