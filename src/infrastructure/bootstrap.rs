//! Composition root: wires configuration and adapters into the pipeline.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::{
    FilePrivateStateStore, HttpLedgerClient, HttpWalletConnection, NetworkProbe,
};
use crate::application::{Orchestrator, ProviderConfigurator, Services};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::ProgressReporter;

/// Wallet connection against the configured funding source.
///
/// # Errors
///
/// Returns an error if the funding URL cannot be resolved.
#[allow(clippy::result_large_err)]
pub fn build_wallet(config: &Config) -> Result<HttpWalletConnection> {
    let funding = config.funding_url()?;
    info!(funding = %funding, "Funding source");
    Ok(HttpWalletConnection::new(funding, config.probe.timeout()))
}

/// Configurator used on its own by `check connection`.
#[must_use]
pub fn build_configurator(
    config: &Config,
    reporter: Arc<dyn ProgressReporter>,
) -> ProviderConfigurator {
    ProviderConfigurator::new(
        Arc::new(NetworkProbe::new(config.probe.timeout())),
        config.probe.policy(),
        reporter,
    )
}

/// Build the full orchestrator with production adapters.
///
/// # Errors
///
/// Returns an error if the funding URL cannot be resolved.
#[allow(clippy::result_large_err)]
pub fn build_orchestrator(
    config: &Config,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Orchestrator> {
    let services = Services {
        wallet: Arc::new(build_wallet(config)?),
        probe: Arc::new(NetworkProbe::new(config.probe.timeout())),
        ledger: Arc::new(HttpLedgerClient::new(config.deploy.request_timeout())),
        private_state: Arc::new(FilePrivateStateStore::new(
            &config.contract.private_state_path,
        )),
        reporter,
    };
    Ok(Orchestrator::new(
        services,
        config.policies(),
        config.contract.spec(),
    ))
}
