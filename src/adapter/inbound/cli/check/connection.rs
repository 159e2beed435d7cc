use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{init_logging, load_config, output};
use crate::domain::ServiceEndpointSet;
use crate::error::{Error, PipelineError, Result};
use crate::infrastructure::bootstrap::build_configurator;
use crate::port::TracingReporter;

/// Probe every configured endpoint and report each one.
pub async fn execute_connection(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    init_logging(&config.logging);
    let endpoints = ServiceEndpointSet::parse(&config.endpoint_uris()?)?;

    output::section("Connection Check");
    output::field("Network", config.network);

    let configurator = build_configurator(&config, Arc::new(TracingReporter));
    let cancel = CancellationToken::new();

    let pb = output::spinner("Probing endpoints...");
    let checks = configurator.check(&endpoints, &cancel).await?;
    let unreachable = checks.iter().filter(|c| !c.is_reachable()).count();
    if unreachable == 0 {
        output::spinner_success(&pb, "Endpoints probed");
    } else {
        output::spinner_fail(&pb, "Endpoints probed");
    }

    for check in &checks {
        match &check.error {
            None => output::success(&format!("{} reachable at {}", check.endpoint, check.url)),
            Some(reason) => output::warning(&format!(
                "{} unreachable at {} after {} attempts: {reason}",
                check.endpoint, check.url, check.attempts
            )),
        }
    }

    match checks.into_iter().find(|c| !c.is_reachable()) {
        None => {
            output::success("Connection checks passed");
            Ok(())
        }
        Some(first) => Err(Error::Pipeline(PipelineError::EndpointUnreachable {
            endpoint: first.endpoint,
            url: first.url.to_string(),
            reason: first
                .error
                .unwrap_or_else(|| format!("{unreachable} endpoint(s) unreachable")),
        })),
    }
}
