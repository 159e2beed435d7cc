//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the wallet seed comes from the
//! `DEPLOY_WALLET_SEED` environment variable and never from the file.
//!
//! # Example
//!
//! ```no_run
//! use deployctl::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("deployctl.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::contract::ContractConfig;
use super::endpoints::EndpointsConfig;
use super::logging::LoggingConfig;
use super::policy::{DeployConfig, FundingConfig, ProbeConfig};
use super::wallet::{WalletConfig, SEED_ENV};
use crate::application::{DeploymentPlan, ExistingManifestPolicy, Policies};
use crate::domain::{EndpointUris, Network, GENESIS_SEED};
use crate::error::{ConfigError, Result};

/// Default config file name.
pub const DEFAULT_CONFIG_PATH: &str = "deployctl.toml";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Target network. Only `local` has endpoint defaults.
    #[serde(default)]
    pub network: Network,

    /// Where the deployment manifest is written.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// What to do when a manifest already exists.
    #[serde(default)]
    pub existing_manifest: ExistingManifestPolicy,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub funding: FundingConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("deployment.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            manifest_path: default_manifest_path(),
            existing_manifest: ExistingManifestPolicy::default(),
            endpoints: EndpointsConfig::default(),
            wallet: WalletConfig::default(),
            funding: FundingConfig::default(),
            probe: ProbeConfig::default(),
            deploy: DeployConfig::default(),
            contract: ContractConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Reads the wallet seed from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.wallet.seed = std::env::var(SEED_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// Lets the local network run without any config file.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] or [`ConfigError::InvalidValue`]
    /// naming the offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.endpoints.resolve(self.network)?;
        self.endpoints.funding_url(self.network)?;

        if self.manifest_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "manifest_path",
            }
            .into());
        }

        if self.funding.timeout_secs == 0 {
            return Err(invalid("funding.timeout_secs", "must be greater than 0"));
        }
        if self.funding.initial_interval_ms == 0 {
            return Err(invalid("funding.initial_interval_ms", "must be greater than 0"));
        }
        if self.funding.max_interval_ms < self.funding.initial_interval_ms {
            return Err(invalid(
                "funding.max_interval_ms",
                "must be >= initial_interval_ms",
            ));
        }
        if self.funding.backoff_multiplier.is_nan() || self.funding.backoff_multiplier < 1.0 {
            return Err(invalid("funding.backoff_multiplier", "must be >= 1.0"));
        }
        if self.funding.max_consecutive_failures == 0 {
            return Err(invalid(
                "funding.max_consecutive_failures",
                "must be greater than 0",
            ));
        }

        if self.probe.attempts == 0 {
            return Err(invalid("probe.attempts", "must be greater than 0"));
        }
        if self.probe.timeout_ms == 0 {
            return Err(invalid("probe.timeout_ms", "must be greater than 0"));
        }

        if self.deploy.confirmation_timeout_secs == 0 {
            return Err(invalid(
                "deploy.confirmation_timeout_secs",
                "must be greater than 0",
            ));
        }
        if self.deploy.poll_interval_ms == 0 {
            return Err(invalid("deploy.poll_interval_ms", "must be greater than 0"));
        }
        if self.deploy.request_timeout_secs == 0 {
            return Err(invalid(
                "deploy.request_timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.contract.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "contract.name",
            }
            .into());
        }
        if self.contract.private_state_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "contract.private_state_id",
            }
            .into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be 'pretty' or 'json'"));
        }

        Ok(())
    }

    /// The wallet seed to deploy with.
    ///
    /// The local network falls back to the genesis seed when none is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no seed is set on a
    /// network other than `local`.
    #[allow(clippy::result_large_err)]
    pub fn seed(&self) -> Result<String> {
        match (&self.wallet.seed, self.network) {
            (Some(seed), _) => Ok(seed.clone()),
            (None, Network::Local) => {
                warn!("{SEED_ENV} not set, using the genesis seed for the local network");
                Ok(GENESIS_SEED.to_string())
            }
            (None, _) => Err(ConfigError::MissingField { field: SEED_ENV }.into()),
        }
    }

    /// Raw endpoint URIs for the configured network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for unset endpoints on
    /// networks without defaults.
    #[allow(clippy::result_large_err)]
    pub fn endpoint_uris(&self) -> Result<EndpointUris> {
        Ok(self.endpoints.resolve(self.network)?)
    }

    /// Funding source URL for the configured network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if it cannot be determined.
    #[allow(clippy::result_large_err)]
    pub fn funding_url(&self) -> Result<Url> {
        Ok(self.endpoints.funding_url(self.network)?)
    }

    #[must_use]
    pub fn policies(&self) -> Policies {
        Policies {
            funding: self.funding.policy(),
            probe: self.probe.policy(),
            confirmation: self.deploy.policy(),
            existing_manifest: self.existing_manifest,
        }
    }

    /// Build the plan for one deployment run.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed or endpoints cannot be resolved.
    #[allow(clippy::result_large_err)]
    pub fn plan(&self) -> Result<DeploymentPlan> {
        Ok(DeploymentPlan {
            seed: self.seed()?,
            network: self.network,
            endpoints: self.endpoint_uris()?,
            min_balance: self.wallet.min_balance,
            funding_timeout: self.funding.timeout(),
            initial_private_state: self.contract.initial_private_state.clone(),
            manifest_path: self.manifest_path.clone(),
        })
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_config_targets_local_stack() {
        let config: Config = toml::from_str("").unwrap();
        config.validate().unwrap();
        assert_eq!(config.network, Network::Local);
        assert_eq!(config.manifest_path, PathBuf::from("deployment.json"));
        assert_eq!(config.funding.timeout_secs, 300);
        assert_eq!(config.probe.attempts, 3);
        assert_eq!(
            config.endpoint_uris().unwrap().indexer_ws,
            "ws://127.0.0.1:8088/api/v1/graphql/ws"
        );
    }

    #[test]
    fn local_without_seed_uses_genesis() {
        let mut config = Config::default();
        config.wallet.seed = None;
        assert_eq!(config.seed().unwrap(), GENESIS_SEED);
    }

    #[test]
    fn testnet_without_seed_is_missing_field() {
        let mut config = Config {
            network: Network::Testnet,
            ..Config::default()
        };
        config.wallet.seed = None;
        assert!(matches!(
            config.seed(),
            Err(Error::Config(ConfigError::MissingField {
                field: "DEPLOY_WALLET_SEED"
            }))
        ));
    }

    #[test]
    fn rejects_shrinking_backoff() {
        let config: Config = toml::from_str("[funding]\nbackoff_multiplier = 0.5\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "funding.backoff_multiplier",
                ..
            }))
        ));
    }

    #[test]
    fn policies_follow_sections() {
        let config: Config = toml::from_str(
            r#"
existing_manifest = "refuse"

[funding]
initial_interval_ms = 250
max_interval_ms = 4000
jitter = false

[probe]
attempts = 5
delay_ms = 100
"#,
        )
        .unwrap();

        let policies = config.policies();
        assert_eq!(policies.funding.initial_interval, Duration::from_millis(250));
        assert_eq!(policies.funding.max_interval, Duration::from_secs(4));
        assert!(!policies.funding.jitter);
        assert_eq!(policies.probe.attempts, 5);
        assert_eq!(policies.existing_manifest, ExistingManifestPolicy::Refuse);
    }
}
