//! lesspy CLI entrypoint

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lesspy::cli::{self, Cli};

fn main() -> ExitCode {
    // Initialize tracing (stderr keeps stdout clean for --json)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse and execute CLI
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::report(&err);
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
