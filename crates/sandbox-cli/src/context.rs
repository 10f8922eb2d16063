//! Location resolution for CLI commands
//!
//! Precedence, lowest first: discovered defaults, `--config` file, then the
//! per-path flags (or their `SANDBOX_*` environment variables).

use std::path::{Path, PathBuf};

use sandbox_core::{AppPaths, SandboxConfig};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Resolve the locations every command works with.
pub fn resolve_paths(cli: &Cli) -> Result<AppPaths> {
    let mut paths = AppPaths::discover()?;

    if let Some(config_path) = &cli.config {
        if !config_path.is_file() {
            return Err(CliError::user(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
        let config = SandboxConfig::load(config_path)?;
        paths = paths.with_config(&config);
    }

    let cwd = std::env::current_dir()?;
    Ok(paths.with_config(&flag_overrides(cli, &cwd)))
}

/// Flags are relative to the working directory, not the install.
fn flag_overrides(cli: &Cli, cwd: &Path) -> SandboxConfig {
    let absolute = |p: &Option<PathBuf>| p.as_ref().map(|p| cwd.join(p));
    SandboxConfig {
        manifest: absolute(&cli.manifest),
        sandbox_root: absolute(&cli.sandbox),
        report_dir: absolute(&cli.report_dir),
        asset_root: absolute(&cli.assets),
        ..Default::default()
    }
}
