//! Handler for `deployctl manifest show`.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::application::DeploymentRecorder;
use crate::error::{Error, Result};

/// Print the manifest recorded at `path`.
#[allow(clippy::result_large_err)]
pub fn execute_show(path: &Path) -> Result<()> {
    let Some(manifest) = DeploymentRecorder::load(path)? else {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no manifest at {}", path.display()),
        )));
    };

    if output::is_json() {
        output::json_output(serde_json::to_value(&manifest)?);
        return Ok(());
    }

    output::section("Deployment");
    output::field("Address", output::highlight(&manifest.resource_address));
    output::field("Network", manifest.network);
    output::field("Deployed at", manifest.deployed_at.to_rfc3339());
    if let Some(tx) = &manifest.transaction {
        output::field("Transaction", &tx.id);
        if let Some(height) = tx.block_height {
            output::field("Block", height);
        }
    }

    output::section("Endpoints");
    output::field("indexer", &manifest.endpoints.indexer);
    output::field("indexer_ws", &manifest.endpoints.indexer_ws);
    output::field("node", &manifest.endpoints.node);
    output::field("proof_server", &manifest.endpoints.proof_server);
    Ok(())
}
