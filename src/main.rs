use std::process::ExitCode;

use clap::Parser;
use deployctl::adapter::inbound::cli::{self, command::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    // reqwest and tungstenite both pull in rustls; pin the ring provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    cli::run(cli).await
}
