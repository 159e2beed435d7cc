use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{config_path, load_config, output};
use crate::domain::EndpointKind;
use crate::error::Result;
use crate::infrastructure::config::wallet::SEED_ENV;

/// Validate the configuration and show what a deploy would use.
#[allow(clippy::result_large_err)]
pub fn execute_config(arg: &ConfigPathArg) -> Result<()> {
    let path = config_path(arg);
    let config = load_config(arg)?;
    let uris = config.endpoint_uris()?;
    let funding = config.funding_url()?;

    output::section("Configuration");
    if path.exists() {
        output::field("File", path.display());
    } else {
        output::field("File", output::muted("none (defaults)"));
    }
    output::field("Network", output::highlight(config.network));
    output::field("Manifest", config.manifest_path.display());
    output::field("Contract", &config.contract.name);
    output::field("Min balance", config.wallet.min_balance);
    output::field(
        "Seed",
        if config.wallet.seed.is_some() {
            SEED_ENV
        } else {
            "genesis (local only)"
        },
    );

    output::section("Endpoints");
    for kind in EndpointKind::ALL {
        output::field(kind.name(), uris.get(kind));
    }
    output::field("funding", &funding);

    // Surfaces a missing seed on remote networks without echoing it.
    config.seed()?;

    output::success("Configuration valid");
    Ok(())
}
