//! gitdid - open and sync linked production, preprod and develop pull requests

mod cli;

use clap::Parser;
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Open and sync linked production, preprod and develop pull requests for the current branch.
///
/// Run it from your feature branch. The first run asks for ticket IDs, a title
/// and a summary; later runs push new commits to the companion branches.
#[derive(Parser, Debug)]
#[command(name = "gitdid", version, about, long_about)]
struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli::run_workflow(&cli.path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            anstream::eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}
