//! Sandbox integrity CLI
//!
//! Validates a sandbox folder against its manifest and repairs what it can.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.clone() else {
        println!("{} Sandbox integrity check", "sandbox".green().bold());
        println!();
        println!("Run {} for available commands.", "sandbox --help".cyan());
        return Ok(true);
    };

    let paths = context::resolve_paths(&cli)?;
    tracing::debug!(?paths, "Resolved locations");

    match command {
        Commands::Check => commands::run_check(&paths),
        Commands::Repair { json } => commands::run_repair(&paths, json),
        Commands::Resolve { tool } => commands::run_resolve(&paths, &tool),
        Commands::Paths => commands::run_paths(&paths),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings, or everything with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_ok() && verbose {
        tracing::debug!("Verbose mode enabled");
    }
}
