//! dynform CLI
//!
//! # Exit Codes
//!
//! - 0: success
//! - 1: the submission failed validation
//! - 3: invalid input or arguments
//! - 4: file not found or unreadable
//! - 5: schema rejected
//! - 10: internal error

use clap::Parser;
use dynform_cli::{run_cli, Cli};
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
