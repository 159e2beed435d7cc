use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{load_config, output};
use crate::domain::{Identity, Seed};
use crate::error::Result;

/// Show the address derived from the configured seed.
#[allow(clippy::result_large_err)]
pub fn execute_address(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    let identity = Identity::from_seed(Seed::parse(&config.seed()?)?);

    if output::is_json() {
        output::json_output(serde_json::json!({
            "network": config.network,
            "address": identity.address(),
        }));
        return Ok(());
    }

    output::section("Wallet Address");
    output::field("Network", config.network);
    output::field("Address", identity.address());
    Ok(())
}
