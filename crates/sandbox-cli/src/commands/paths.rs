//! Resolve and paths command implementations

use colored::Colorize;

use sandbox_core::AppPaths;
use sandbox_tools::{ToolResolver, platform_writer};

use crate::error::Result;

/// Run the resolve command
///
/// Prints the resolved executable on stdout, or every candidate tried.
pub fn run_resolve(paths: &AppPaths, tool: &str) -> Result<bool> {
    let resolver = ToolResolver::new(paths.tool_search.clone());

    if let Some(exe) = resolver.resolve(tool) {
        println!("{}", exe.display());
        return Ok(true);
    }

    eprintln!("{} Tool not found: {}", "MISSING".yellow().bold(), tool.cyan());
    let candidates = resolver.candidates(tool);
    if candidates.is_empty() {
        eprintln!("   '{}' is not a plain tool name", tool);
    } else {
        eprintln!("Tried:");
        for candidate in candidates {
            eprintln!("   {} {}", "-".dimmed(), candidate.display());
        }
    }
    Ok(false)
}

/// Run the paths command
pub fn run_paths(paths: &AppPaths) -> Result<bool> {
    let rows = [
        ("Base", paths.base_dir.display().to_string()),
        ("Assets", paths.asset_root.display().to_string()),
        ("Manifest", paths.manifest_path.display().to_string()),
        ("Sandbox", paths.sandbox_root.display().to_string()),
        ("Reports", paths.report_dir.display().to_string()),
        ("Tools", paths.tool_search.packaged.display().to_string()),
    ];
    for (label, value) in rows {
        println!("{:<9} {}", format!("{}:", label).bold(), value);
    }
    for fallback in &paths.tool_search.fallbacks {
        println!("{:<9} {}", "", fallback.display().to_string().dimmed());
    }
    for (stem, tool) in paths.tool_aliases.iter() {
        println!("{:<9} {} -> {}", "Alias:".bold(), stem, tool);
    }
    println!("{:<9} {}", "Shortcut:".bold(), platform_writer().name());
    Ok(true)
}
