//! Handler for `deployctl deploy`.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::cli::command::DeployArgs;
use crate::adapter::inbound::cli::{init_logging, load_config, output};
use crate::application::{Deployment, ExistingManifestPolicy, StageFailure};
use crate::domain::LifecycleState;
use crate::error::{Error, PipelineError, Result};
use crate::infrastructure::bootstrap::build_orchestrator;
use crate::infrastructure::config::settings::Config;
use crate::port::TracingReporter;

/// Run the full pipeline: fund, probe, deploy, record, serve.
///
/// Returns `ExitCode::FAILURE` for pipeline failures after printing the
/// failing stage; configuration problems surface as `Err`.
pub async fn execute(args: &DeployArgs) -> Result<ExitCode> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let log_file = init_logging(&config.logging);
    let plan = config.plan()?;

    if !args.no_banner {
        output::header(env!("CARGO_PKG_VERSION"));
    }
    output::field("Network", output::highlight(plan.network));
    output::field("Contract", &config.contract.name);
    output::field("Manifest", plan.manifest_path.display());
    if let Some(path) = &log_file {
        output::field("Log file", path.display());
    }

    if plan.manifest_path.exists() {
        match config.existing_manifest {
            ExistingManifestPolicy::Overwrite => output::warning(&format!(
                "{} exists and will be overwritten",
                plan.manifest_path.display()
            )),
            ExistingManifestPolicy::Refuse => output::warning(&format!(
                "{} exists; recording will be refused",
                plan.manifest_path.display()
            )),
        }
    }

    let orchestrator = build_orchestrator(&config, Arc::new(TracingReporter))?;
    let progress = tokio::spawn(print_stages(
        orchestrator.controller().lifecycle().subscribe(),
        config.contract.name.clone(),
    ));

    let outcome = orchestrator.run(&plan, print_deployment).await;
    progress.abort();

    match outcome {
        Ok(deployment) => {
            info!(address = %deployment.result.address, "Deployment run finished");
            output::success("Shut down cleanly");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            report_failure(&failure);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn apply_overrides(config: &mut Config, args: &DeployArgs) {
    if let Some(network) = args.network {
        config.network = network;
    }
    if let Some(path) = &args.manifest {
        config.manifest_path = path.clone();
    }
    if args.refuse_existing {
        config.existing_manifest = ExistingManifestPolicy::Refuse;
    }
}

async fn print_stages(mut stages: watch::Receiver<LifecycleState>, contract: String) {
    while stages.changed().await.is_ok() {
        let stage = *stages.borrow_and_update();
        match stage {
            LifecycleState::BuildingIdentity => output::action("Deriving", "wallet identity"),
            LifecycleState::AwaitingFunds => output::action("Awaiting", "funds"),
            LifecycleState::ConfiguringProviders => output::action("Probing", "service endpoints"),
            LifecycleState::Deploying => output::action("Deploying", &contract),
            LifecycleState::Recording => output::action("Recording", "deployment manifest"),
            LifecycleState::ShuttingDown => output::action("Shutting down", "wallet connection"),
            LifecycleState::Idle | LifecycleState::Serving | LifecycleState::Failed => {}
        }
    }
}

fn print_deployment(deployment: &Deployment) {
    output::action_done("Deployed", &deployment.result.address);
    output::field("Address", output::highlight(&deployment.result.address));
    output::field("Transaction", &deployment.result.tx.tx_id);
    if let Some(height) = deployment.result.tx.block_height {
        output::field("Block", height);
    }
    output::field("Manifest", deployment.manifest_path.display());
    output::hint("serving until interrupted, press Ctrl+C to shut down");
}

fn report_failure(failure: &StageFailure) {
    output::stage_failed(failure.stage, failure.kind(), &failure.error.to_string());

    match &failure.error {
        Error::Pipeline(PipelineError::DeploymentUnconfirmed { tx_id, .. }) => {
            output::warning(&format!(
                "transaction {} may still be included; check the ledger before redeploying",
                tx_id.as_deref().unwrap_or("(unknown id)")
            ));
        }
        Error::Pipeline(PipelineError::Persistence { address, .. }) => {
            output::warning(&format!(
                "contract is deployed at {address} but no manifest was written"
            ));
        }
        _ => {}
    }
}
