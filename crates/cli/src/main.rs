//! bucketsync - CI build step for S3-compatible object storage
//!
//! Uploads files matching a glob to a bucket, or downloads a bucket prefix
//! to local disk, then exits with a status reflecting the outcome.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bucketsync::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags
    let default_level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the run summary
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
