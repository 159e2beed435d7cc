//! Wallet configuration.

use serde::{Deserialize, Deserializer};

use crate::domain::Balance;

/// Environment variable holding the wallet seed.
pub const SEED_ENV: &str = "DEPLOY_WALLET_SEED";

/// Wallet configuration.
///
/// The seed is never read from the config file; it comes from
/// [`SEED_ENV`].
#[derive(Clone, Deserialize)]
pub struct WalletConfig {
    /// Balance the wallet must reach before deploying, in the ledger's
    /// smallest unit. TOML integers stop at `i64`, so larger amounts are
    /// written as strings.
    #[serde(default = "default_min_balance", deserialize_with = "balance")]
    pub min_balance: Balance,
    #[serde(skip)]
    pub seed: Option<String>,
}

fn default_min_balance() -> Balance {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBalance {
    Number(u64),
    Text(String),
}

fn balance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
    match RawBalance::deserialize(deserializer)? {
        RawBalance::Number(n) => Ok(Balance::from(n)),
        RawBalance::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid balance '{s}': {e}"))),
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            min_balance: default_min_balance(),
            seed: None,
        }
    }
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("min_balance", &self.min_balance)
            .field("seed", &self.seed.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
