use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{init_logging, load_config, output};
use crate::domain::{Identity, Seed};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_wallet;
use crate::port::WalletConnection;

/// Query the funding source once for the wallet balance.
pub async fn execute_balance(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    init_logging(&config.logging);
    let identity = Identity::from_seed(Seed::parse(&config.seed()?)?);
    let wallet = build_wallet(&config)?;

    let pb = output::spinner("Querying funding source...");
    let balance = wallet.balance(identity.address()).await;
    let _ = wallet.close().await;

    let balance = match balance {
        Ok(balance) => {
            output::spinner_success(&pb, "Balance retrieved");
            balance
        }
        Err(e) => {
            output::spinner_fail(&pb, "Funding source unavailable");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_output(serde_json::json!({
            "address": identity.address(),
            "balance": balance.to_string(),
            "minBalance": config.wallet.min_balance.to_string(),
        }));
        return Ok(());
    }

    output::section("Wallet Balance");
    output::field("Address", identity.address());
    output::field("Funding", wallet.funding_url());
    output::field("Balance", balance);
    output::field("Required", config.wallet.min_balance);
    if balance >= config.wallet.min_balance {
        output::success("Wallet is funded");
    } else {
        output::warning("Balance below the deploy minimum");
    }
    Ok(())
}
