//! Command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use sozdik::cli::{run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
