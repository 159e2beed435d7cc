//! Command-line interface definitions.
//!
//! Defines the CLI structure for deployctl using `clap`: the deploy
//! pipeline itself plus diagnostics for configuration, connectivity, the
//! wallet, and recorded manifests.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Network;

/// Deploy a contract to a ledger network and record the result
#[derive(Parser, Debug)]
#[command(name = "deployctl")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fund the wallet, deploy the contract, record the manifest, and serve
    /// until interrupted
    Deploy(DeployArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Inspect the deployment wallet
    #[command(subcommand)]
    Wallet(WalletCommand),

    /// Inspect recorded deployments
    #[command(subcommand)]
    Manifest(ManifestCommand),
}

/// Subcommands for `deployctl check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration and show the effective endpoints.
    Config(ConfigPathArg),
    /// Probe every service endpoint.
    Connection(ConfigPathArg),
}

/// Subcommands for `deployctl wallet`.
#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Display the address derived from the wallet seed.
    Address(ConfigPathArg),
    /// Query the funding source once for the wallet balance.
    Balance(ConfigPathArg),
}

/// Subcommands for `deployctl manifest`.
#[derive(Subcommand, Debug)]
pub enum ManifestCommand {
    /// Print a recorded deployment manifest.
    Show(ManifestShowArgs),
}

/// Shared argument for commands that read the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigPathArg {
    /// Path to the configuration file. Defaults to `deployctl.toml` in the
    /// current directory, then `~/.deployctl/config.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `deployctl deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Override the configured network (local, testnet, mainnet).
    #[arg(long)]
    pub network: Option<Network>,

    /// Override where the manifest is written.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Fail instead of overwriting an existing manifest.
    #[arg(long)]
    pub refuse_existing: bool,

    /// Skip the startup banner.
    #[arg(long)]
    pub no_banner: bool,
}

/// Arguments for `deployctl manifest show`.
#[derive(Args, Debug)]
pub struct ManifestShowArgs {
    /// Manifest file to read.
    #[arg(default_value = "deployment.json")]
    pub path: PathBuf,
}
