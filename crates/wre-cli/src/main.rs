//! Word Runtime Engine - CLI
//!
//! Runs program images produced by an external code generator.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{Cli, Commands};
use commands::{generate, inspect, run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Run { path, machine } => run::run_file(path, machine),
        Commands::Generate { path } => generate::write_sample(path),
        Commands::Inspect { path } => inspect::inspect_file(path),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
