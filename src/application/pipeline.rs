//! The deployment orchestrator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::bootstrap::WalletBootstrapper;
use super::configure::ProviderConfigurator;
use super::deploy::{ContractDeployer, ContractSpec};
use super::policy::{ConfirmationPolicy, FundingPolicy, ProbePolicy};
use super::record::{DeploymentRecorder, ExistingManifestPolicy};
use super::shutdown::ShutdownController;
use crate::domain::{
    Balance, DeploymentManifest, DeploymentResult, EndpointUris, LifecycleState, Network,
};
use crate::error::Error;
use crate::port::{
    EndpointProbe, LedgerClient, PrivateStateStore, ProgressEvent, ProgressReporter,
    WalletConnection,
};

/// Inputs for one deployment run.
#[derive(Clone)]
pub struct DeploymentPlan {
    /// Raw seed, validated by the first stage.
    pub seed: String,
    pub network: Network,
    pub endpoints: EndpointUris,
    pub min_balance: Balance,
    pub funding_timeout: Duration,
    pub initial_private_state: serde_json::Value,
    pub manifest_path: PathBuf,
}

impl std::fmt::Debug for DeploymentPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentPlan")
            .field("seed", &"<redacted>")
            .field("network", &self.network)
            .field("endpoints", &self.endpoints)
            .field("min_balance", &self.min_balance)
            .field("funding_timeout", &self.funding_timeout)
            .field("manifest_path", &self.manifest_path)
            .finish_non_exhaustive()
    }
}

/// A pipeline failure and the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} failed ({}): {error}", error.kind())]
pub struct StageFailure {
    pub stage: LifecycleState,
    #[source]
    pub error: Error,
}

impl StageFailure {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// A completed and recorded deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub result: DeploymentResult,
    pub manifest: DeploymentManifest,
    pub manifest_path: PathBuf,
}

/// Remote services and sinks the pipeline drives.
pub struct Services {
    pub wallet: Arc<dyn WalletConnection>,
    pub probe: Arc<dyn EndpointProbe>,
    pub ledger: Arc<dyn LedgerClient>,
    pub private_state: Arc<dyn PrivateStateStore>,
    pub reporter: Arc<dyn ProgressReporter>,
}

/// Retry and persistence policies, one per stage.
#[derive(Debug, Clone, Default)]
pub struct Policies {
    pub funding: FundingPolicy,
    pub probe: ProbePolicy,
    pub confirmation: ConfirmationPolicy,
    pub existing_manifest: ExistingManifestPolicy,
}

/// Runs the stages in order and guarantees teardown on every exit path.
pub struct Orchestrator {
    bootstrapper: WalletBootstrapper,
    configurator: ProviderConfigurator,
    deployer: ContractDeployer,
    recorder: DeploymentRecorder,
    controller: ShutdownController,
    private_state: Arc<dyn PrivateStateStore>,
    reporter: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    pub fn new(services: Services, policies: Policies, contract: ContractSpec) -> Self {
        let Services {
            wallet,
            probe,
            ledger,
            private_state,
            reporter,
        } = services;

        Self {
            bootstrapper: WalletBootstrapper::new(
                Arc::clone(&wallet),
                policies.funding,
                Arc::clone(&reporter),
            ),
            configurator: ProviderConfigurator::new(probe, policies.probe, Arc::clone(&reporter)),
            deployer: ContractDeployer::new(
                ledger,
                contract,
                policies.confirmation,
                Arc::clone(&reporter),
            ),
            recorder: DeploymentRecorder::new(policies.existing_manifest, Arc::clone(&reporter)),
            controller: ShutdownController::new(wallet, Arc::clone(&reporter)),
            private_state,
            reporter,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &ShutdownController {
        &self.controller
    }

    /// Run every stage through `Recording`.
    ///
    /// Does not release the wallet; [`run`](Self::run) owns teardown.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. Later stages are not attempted.
    pub async fn deploy(&self, plan: &DeploymentPlan) -> Result<Deployment, StageFailure> {
        let cancel = self.controller.token();

        let stage = LifecycleState::BuildingIdentity;
        self.enter(stage)?;
        let identity = self
            .bootstrapper
            .bootstrap(&plan.seed)
            .map_err(|e| self.failure(stage, e))?;

        let stage = LifecycleState::AwaitingFunds;
        self.enter(stage)?;
        let identity = self
            .bootstrapper
            .await_funds(identity, plan.min_balance, plan.funding_timeout, &cancel)
            .await
            .map_err(|e| self.failure(stage, e))?;

        let stage = LifecycleState::ConfiguringProviders;
        self.enter(stage)?;
        let bundle = self
            .configurator
            .configure(
                identity,
                &plan.endpoints,
                Arc::clone(&self.private_state),
                &cancel,
            )
            .await
            .map_err(|e| self.failure(stage, e))?;
        let endpoints = bundle.endpoints().clone();

        let stage = LifecycleState::Deploying;
        self.enter(stage)?;
        let result = self
            .deployer
            .deploy(bundle, plan.initial_private_state.clone(), &cancel)
            .await
            .map_err(|e| self.failure(stage, e))?;

        let stage = LifecycleState::Recording;
        self.enter(stage)?;
        let manifest = DeploymentManifest::new(&result, plan.network, &endpoints, Utc::now());
        self.recorder
            .record(&manifest, &plan.manifest_path)
            .map_err(|e| self.failure(stage, e))?;

        Ok(Deployment {
            result,
            manifest,
            manifest_path: plan.manifest_path.clone(),
        })
    }

    /// Deploy, serve until interrupted, then release everything.
    ///
    /// The signal handler is installed before the first stage so an
    /// interrupt is honored wherever the pipeline is suspended.
    /// `on_deployed` runs once the manifest is durable, before serving.
    ///
    /// # Errors
    ///
    /// Returns the failing stage. An interrupt before `Serving` is a
    /// failure; an interrupt while serving is a clean exit.
    pub async fn run<F>(&self, plan: &DeploymentPlan, on_deployed: F) -> Result<Deployment, StageFailure>
    where
        F: FnOnce(&Deployment),
    {
        self.controller.install_signal_handler();
        info!(network = %plan.network, "Starting deployment");

        let deployment = match self.deploy(plan).await {
            Ok(deployment) => deployment,
            Err(failure) => {
                self.controller.abort().await;
                return Err(failure);
            }
        };

        on_deployed(&deployment);

        if let Err(e) = self.controller.serve().await {
            let failure = self.failure(LifecycleState::Serving, e);
            self.controller.abort().await;
            return Err(failure);
        }
        if let Err(e) = self.controller.shutdown().await {
            warn!(error = %e, "Shutdown transition failed");
        }
        Ok(deployment)
    }

    fn enter(&self, stage: LifecycleState) -> Result<(), StageFailure> {
        self.controller
            .lifecycle()
            .advance(stage)
            .map_err(|e| self.failure(stage, e.into()))?;
        self.reporter.report(ProgressEvent::StageEntered { stage });
        Ok(())
    }

    fn failure(&self, stage: LifecycleState, error: Error) -> StageFailure {
        self.reporter.report(ProgressEvent::StageFailed {
            stage,
            kind: error.kind(),
            message: error.to_string(),
        });
        StageFailure { stage, error }
    }
}
