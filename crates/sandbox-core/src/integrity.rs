//! The integrity run: load, reconcile, repair, report
//!
//! [`IntegrityService::validate_and_repair`] never fails. A missing or broken
//! manifest is reported through sentinel values in [`RunResult::issue_count`],
//! individual repair failures through [`RepairRecord`]s, and a report that
//! cannot be written through `report_path == None`.

use std::path::{Path, PathBuf};

use chrono::Local;
use sandbox_fs::NormalizedPath;
use sandbox_manifest::Manifest;
use sandbox_tools::{ShortcutWriter, ToolAliases, ToolResolver, platform_writer};
use serde::Serialize;
use tracing::{info, warn};

use crate::Result;
use crate::config::AppPaths;
use crate::reconcile::{Finding, reconcile};
use crate::repair::{RepairContext, RepairOutcome, repair};
use crate::report::ReportSink;

/// `issue_count` when no manifest exists.
pub const MANIFEST_MISSING: i32 = -1;

/// `issue_count` when the manifest exists but cannot be used.
pub const MANIFEST_FATAL: i32 = -2;

/// Overall state of the sandbox after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Nothing was out of compliance
    Compliant,
    /// Every discrepancy was repaired
    Repaired,
    /// At least one discrepancy could not be repaired
    Incomplete,
    ManifestMissing,
    ManifestFatal,
}

/// The repair attempted for one discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairRecord {
    pub path: String,
    pub kind: String,
    pub outcome: RepairOutcome,
}

/// Outcome of one integrity run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Where the report was written, if anywhere
    pub report_path: Option<PathBuf>,
    /// Discrepancies found, or [`MANIFEST_MISSING`] / [`MANIFEST_FATAL`]
    pub issue_count: i32,
    pub manifest_found: bool,
    pub repaired: usize,
    /// Entries skipped with a warning; not counted as issues
    pub warnings: usize,
    /// One record per discrepancy, in manifest order
    pub repairs: Vec<RepairRecord>,
}

impl RunResult {
    fn degraded(issue_count: i32, manifest_found: bool, report_path: Option<PathBuf>) -> Self {
        Self {
            report_path,
            issue_count,
            manifest_found,
            repaired: 0,
            warnings: 0,
            repairs: Vec::new(),
        }
    }

    pub fn status(&self) -> RunStatus {
        match self.issue_count {
            MANIFEST_MISSING => RunStatus::ManifestMissing,
            MANIFEST_FATAL => RunStatus::ManifestFatal,
            0 => RunStatus::Compliant,
            _ if self.unrepaired() == 0 => RunStatus::Repaired,
            _ => RunStatus::Incomplete,
        }
    }

    /// Discrepancies whose repair did not succeed.
    pub fn unrepaired(&self) -> usize {
        self.repairs.len() - self.repaired
    }
}

/// A discrepancy found by a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    pub path: String,
    pub kind: String,
    pub detail: Option<String>,
}

/// An entry a dry run would skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckWarning {
    pub path: String,
    pub kind: String,
    pub reason: String,
}

/// Result of a read-only [`IntegrityService::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub issues: Vec<CheckIssue>,
    pub warnings: Vec<CheckWarning>,
}

impl CheckSummary {
    pub fn is_compliant(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validates a sandbox against its manifest and repairs what it can.
///
/// Built once by the host and reused; holds no per-run state.
pub struct IntegrityService {
    asset_root: NormalizedPath,
    resolver: ToolResolver,
    tool_aliases: ToolAliases,
    writer: Box<dyn ShortcutWriter>,
    shortcut_description: Option<String>,
}

impl IntegrityService {
    pub fn new(asset_root: &Path, resolver: ToolResolver, writer: Box<dyn ShortcutWriter>) -> Self {
        Self {
            asset_root: NormalizedPath::new(asset_root),
            resolver,
            tool_aliases: ToolAliases::default(),
            writer,
            shortcut_description: None,
        }
    }

    /// Service for a host installation, using the platform's shortcut writer.
    pub fn from_paths(paths: &AppPaths) -> Self {
        let service = Self::new(
            &paths.asset_root,
            ToolResolver::new(paths.tool_search.clone()),
            platform_writer(),
        )
        .with_tool_aliases(paths.tool_aliases.clone());
        match &paths.shortcut_description {
            Some(description) => service.with_shortcut_description(description.clone()),
            None => service,
        }
    }

    /// Description used for shortcuts whose entry declares none.
    pub fn with_shortcut_description(mut self, description: impl Into<String>) -> Self {
        self.shortcut_description = Some(description.into());
        self
    }

    /// Replace the stem-to-tool aliases used for shortcuts without a `target`.
    pub fn with_tool_aliases(mut self, aliases: ToolAliases) -> Self {
        self.tool_aliases = aliases;
        self
    }

    /// Run against the locations in `paths`.
    pub fn run_configured(&self, paths: &AppPaths) -> RunResult {
        self.validate_and_repair(&paths.manifest_path, &paths.sandbox_root, &paths.report_dir)
    }

    /// Bring `workspace_root` into compliance with the manifest and write a report.
    pub fn validate_and_repair(
        &self,
        manifest_path: &Path,
        workspace_root: &Path,
        report_dir: &Path,
    ) -> RunResult {
        let mut report = ReportSink::begin(manifest_path, workspace_root, Local::now());

        let manifest = match Manifest::load(manifest_path) {
            Ok(manifest) => manifest,
            Err(e) if e.is_not_found() => {
                warn!(path = %manifest_path.display(), "Manifest not found; skipping validation");
                report.line("ERROR: Manifest not found. Skipping validation.");
                let report_path = report.persist(report_dir, workspace_root);
                return RunResult::degraded(MANIFEST_MISSING, false, report_path);
            }
            Err(e) => {
                warn!(path = %manifest_path.display(), error = %e, "Manifest unusable; skipping validation");
                report.line(format!("FATAL: Manifest could not be parsed: {}", e.reason()));
                let report_path = report.persist(report_dir, workspace_root);
                return RunResult::degraded(MANIFEST_FATAL, true, report_path);
            }
        };

        let root = NormalizedPath::new(workspace_root);
        let findings: Vec<Finding<'_>> = reconcile(manifest.entries(), &root).collect();
        let issue_total = findings
            .iter()
            .filter(|f| matches!(f, Finding::Discrepancy(_)))
            .count();

        if issue_total == 0 {
            report.line("All items match the manifest. No issues found.");
        } else {
            report.line(format!(
                "Found {} issue(s). Attempting auto-repair where possible...",
                issue_total
            ));
        }

        let ctx = RepairContext {
            asset_root: &self.asset_root,
            resolver: &self.resolver,
            tool_aliases: &self.tool_aliases,
            writer: self.writer.as_ref(),
            default_description: self.shortcut_description.as_deref(),
        };

        let mut repairs = Vec::with_capacity(issue_total);
        let mut warnings = 0;
        if !findings.is_empty() {
            report.blank();
        }
        for finding in &findings {
            match finding {
                Finding::Discrepancy(d) => {
                    report.line(format!("- {}: {} ({})", d.category, d.relative_path, d.entry.kind));
                    if let Some(detail) = &d.detail {
                        report.line(format!("  Note: {}", detail));
                    }
                    let outcome = repair(d, &ctx);
                    for line in &outcome.narrative {
                        report.line(format!("  {}", line));
                    }
                    repairs.push(RepairRecord {
                        path: d.relative_path.clone(),
                        kind: d.entry.kind.to_string(),
                        outcome,
                    });
                }
                Finding::Warning(w) => {
                    warnings += 1;
                    warn!(path = %w.entry.path, reason = %w.reason, "Manifest entry skipped");
                    report.line(format!("- Warning: {} ({}): {}", w.entry.path, w.entry.kind, w.reason));
                }
            }
        }

        let repaired = repairs.iter().filter(|r| r.outcome.succeeded).count();
        if issue_total > 0 {
            report.blank();
            report.line(format!(
                "Summary: {} issue(s) found, {} repaired, {} could not be repaired.",
                issue_total,
                repaired,
                issue_total - repaired
            ));
        }

        let report_path = report.persist(report_dir, workspace_root);
        info!(
            issues = issue_total,
            repaired,
            warnings,
            sandbox = %workspace_root.display(),
            "Integrity run complete"
        );

        RunResult {
            report_path,
            issue_count: i32::try_from(issue_total).unwrap_or(i32::MAX),
            manifest_found: true,
            repaired,
            warnings,
            repairs,
        }
    }

    /// Reconcile without repairing or writing a report.
    pub fn check(&self, manifest_path: &Path, workspace_root: &Path) -> Result<CheckSummary> {
        let manifest = Manifest::load(manifest_path)?;
        let root = NormalizedPath::new(workspace_root);

        let mut summary = CheckSummary::default();
        for finding in reconcile(manifest.entries(), &root) {
            match finding {
                Finding::Discrepancy(d) => summary.issues.push(CheckIssue {
                    path: d.relative_path,
                    kind: d.entry.kind.to_string(),
                    detail: d.detail,
                }),
                Finding::Warning(w) => summary.warnings.push(CheckWarning {
                    path: w.entry.path.clone(),
                    kind: w.entry.kind.to_string(),
                    reason: w.reason,
                }),
            }
        }
        Ok(summary)
    }
}
