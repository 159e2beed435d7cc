//! CLI module graph and command dispatch.

pub mod check;
pub mod command;
pub mod deploy;
pub mod manifest;
pub mod output;
pub mod paths;
pub mod wallet;

use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::Result;
use crate::infrastructure::config::logging::LoggingConfig;
use crate::infrastructure::config::settings::Config;
use command::{
    CheckCommand, Cli, ColorChoice, Commands, ConfigPathArg, ManifestCommand, WalletCommand,
};
use output::OutputConfig;

/// Run a parsed command line and map the outcome to a process exit code.
pub async fn run(cli: Cli) -> ExitCode {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match cli.command {
        Commands::Deploy(args) => deploy::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => {
            check::config::execute_config(&arg).map(|()| ExitCode::SUCCESS)
        }
        Commands::Check(CheckCommand::Connection(arg)) => check::connection::execute_connection(
            &arg,
        )
        .await
        .map(|()| ExitCode::SUCCESS),
        Commands::Wallet(WalletCommand::Address(arg)) => {
            wallet::address::execute_address(&arg).map(|()| ExitCode::SUCCESS)
        }
        Commands::Wallet(WalletCommand::Balance(arg)) => wallet::balance::execute_balance(&arg)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Manifest(ManifestCommand::Show(args)) => {
            manifest::execute_show(&args.path).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Resolve the config file for a command.
#[must_use]
pub fn config_path(arg: &ConfigPathArg) -> PathBuf {
    arg.config.clone().unwrap_or_else(paths::default_config)
}

/// Load the configuration named by `arg`.
///
/// An explicit `--config` must exist; the implicit default may be absent,
/// in which case the local-network defaults apply.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
#[allow(clippy::result_large_err)]
pub fn load_config(arg: &ConfigPathArg) -> Result<Config> {
    match &arg.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(paths::default_config()),
    }
}

/// Initialize logging, letting `-v` and `-q` adjust the configured level.
pub fn init_logging(logging: &LoggingConfig) -> Option<PathBuf> {
    let mut logging = logging.clone();
    match (output::verbosity(), output::is_quiet()) {
        (0, true) => logging.level = "warn".into(),
        (0, false) => {}
        (1, _) => logging.level = "debug".into(),
        _ => logging.level = "trace".into(),
    }
    logging.init()
}
