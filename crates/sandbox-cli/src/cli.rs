//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sandbox integrity check - keep a sandbox folder in line with its manifest
#[derive(Parser, Debug)]
#[command(name = "sandbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file overriding the default locations (TOML, JSON or YAML)
    #[arg(long, global = true, env = "SANDBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Manifest document to validate against
    #[arg(long, global = true, env = "SANDBOX_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Sandbox directory to validate
    #[arg(long, global = true, env = "SANDBOX_ROOT")]
    pub sandbox: Option<PathBuf>,

    /// Directory integrity reports are written to
    #[arg(long, global = true, env = "SANDBOX_REPORT_DIR")]
    pub report_dir: Option<PathBuf>,

    /// Asset tree that `source` entries are copied from
    #[arg(long, global = true, env = "SANDBOX_ASSETS")]
    pub assets: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Report discrepancies without changing anything
    ///
    /// Exits with status 1 when the sandbox is out of compliance.
    Check,

    /// Validate the sandbox, repair what is missing, and write a report
    Repair {
        /// Print the run result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Locate a companion tool executable
    Resolve {
        /// Logical tool name, e.g. OOS.Terminal
        tool: String,
    },

    /// Show the resolved locations
    Paths,
}
