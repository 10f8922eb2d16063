//! Check and repair command implementations

use colored::Colorize;

use sandbox_core::{AppPaths, IntegrityService, RunResult, RunStatus};

use crate::error::Result;

/// Run the check command
///
/// Read-only: reports discrepancies and skipped entries without repairing.
pub fn run_check(paths: &AppPaths) -> Result<bool> {
    println!(
        "{} Checking {}...",
        "=>".blue().bold(),
        paths.sandbox_root.display()
    );

    let service = IntegrityService::from_paths(paths);
    let summary = match service.check(&paths.manifest_path, &paths.sandbox_root) {
        Ok(summary) => summary,
        Err(sandbox_core::Error::Manifest(e)) if e.is_not_found() => {
            println!(
                "{} Manifest not found: {}",
                "MISSING".yellow().bold(),
                paths.manifest_path.display()
            );
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    for warning in &summary.warnings {
        println!(
            "   {} {} ({}): {}",
            "?".yellow(),
            warning.path.cyan(),
            warning.kind.dimmed(),
            warning.reason
        );
    }

    if summary.is_compliant() {
        println!("{} All items match the manifest.", "OK".green().bold());
        return Ok(true);
    }

    println!(
        "{} {} item(s) missing:",
        "MISSING".yellow().bold(),
        summary.issues.len()
    );
    for issue in &summary.issues {
        match &issue.detail {
            Some(detail) => println!(
                "   {} {} ({}): {}",
                "-".yellow(),
                issue.path.cyan(),
                issue.kind.dimmed(),
                detail
            ),
            None => println!("   {} {} ({})", "-".yellow(), issue.path.cyan(), issue.kind.dimmed()),
        }
    }
    println!();
    println!("Run {} to repair.", "sandbox repair".cyan());
    Ok(false)
}

/// Run the repair command
///
/// Succeeds when the sandbox ends up compliant.
pub fn run_repair(paths: &AppPaths, json: bool) -> Result<bool> {
    let service = IntegrityService::from_paths(paths);
    let result = service.run_configured(paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(matches!(result.status(), RunStatus::Compliant | RunStatus::Repaired))
}

fn print_result(result: &RunResult) {
    for record in &result.repairs {
        let marker = if record.outcome.succeeded {
            "+".green()
        } else {
            "!".red()
        };
        println!(
            "   {} {} ({}): {}",
            marker,
            record.path.cyan(),
            record.kind.dimmed(),
            record.outcome.narrative.join(" ")
        );
    }

    match result.status() {
        RunStatus::Compliant => {
            println!("{} All items match the manifest.", "OK".green().bold());
        }
        RunStatus::Repaired => {
            println!(
                "{} Repaired {} issue(s).",
                "OK".green().bold(),
                result.repaired
            );
        }
        RunStatus::Incomplete => {
            println!(
                "{} {} issue(s) found, {} repaired, {} could not be repaired.",
                "INCOMPLETE".red().bold(),
                result.issue_count,
                result.repaired,
                result.unrepaired()
            );
        }
        RunStatus::ManifestMissing => {
            println!("{} Manifest not found. Skipping validation.", "MISSING".yellow().bold());
        }
        RunStatus::ManifestFatal => {
            println!("{} Manifest could not be parsed.", "FATAL".red().bold());
        }
    }

    if result.warnings > 0 {
        println!("{} {} entry(ies) skipped.", "WARN".yellow().bold(), result.warnings);
    }

    match &result.report_path {
        Some(path) => println!("Report: {}", path.display()),
        None => println!("{} No report could be written.", "WARN".yellow().bold()),
    }
}
