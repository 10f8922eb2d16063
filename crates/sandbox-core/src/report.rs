//! Audit report accumulation and persistence
//!
//! A run's report is written once, as a whole, to
//! `<report_dir>/integrity_<YYYYMMDD_HHMMSS>.txt`. If that fails the report
//! goes to `<sandbox_root>/_integrity_report.txt`; if that fails too the run
//! carries on without one. Old reports are never removed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use sandbox_fs::{NormalizedPath, RobustnessConfig, SandboxPath, io};
use tracing::{info, warn};

/// File name prefix of timestamped reports.
pub const REPORT_PREFIX: &str = "integrity_";

/// Upper bound on same-second suffixes before giving up on the primary location.
const MAX_SUFFIX: u32 = 1000;

/// Accumulates report lines during a run.
#[derive(Debug, Clone)]
pub struct ReportSink {
    started: DateTime<Local>,
    lines: Vec<String>,
}

impl ReportSink {
    /// Start a report with the standard header.
    pub fn begin(manifest_path: &Path, sandbox_root: &Path, started: DateTime<Local>) -> Self {
        let mut sink = Self {
            started,
            lines: Vec::new(),
        };
        sink.line("Sandbox Integrity Check");
        sink.line(format!("Manifest: {}", manifest_path.display()));
        sink.line(format!("Sandbox : {}", sandbox_root.display()));
        sink.line(format!("Date    : {}", started.format("%Y-%m-%d %H:%M:%S")));
        sink.blank();
        sink
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// File name for the primary report, e.g. `integrity_20261019_142501.txt`.
    pub fn file_name(&self) -> String {
        format!("{}{}.txt", REPORT_PREFIX, self.started.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report, trying the primary directory and then the sandbox root.
    ///
    /// Consumes the sink so a run cannot write its report twice.
    pub fn persist(self, report_dir: &Path, sandbox_root: &Path) -> Option<PathBuf> {
        let text = self.render();

        match self.write_primary(&NormalizedPath::new(report_dir), &text) {
            Ok(path) => {
                info!(path = %path, "Integrity report written");
                return Some(path.to_native());
            }
            Err(e) => {
                warn!(dir = %report_dir.display(), error = %e, "Primary report location failed; using sandbox");
            }
        }

        let fallback = NormalizedPath::new(sandbox_root).join(SandboxPath::FallbackReport.as_str());
        match io::write_atomic(&fallback, text.as_bytes(), RobustnessConfig::default()) {
            Ok(()) => {
                info!(path = %fallback, "Integrity report written to fallback location");
                Some(fallback.to_native())
            }
            Err(e) => {
                warn!(path = %fallback, error = %e, "Fallback report location failed; no report written");
                None
            }
        }
    }

    fn write_primary(&self, dir: &NormalizedPath, text: &str) -> sandbox_fs::Result<NormalizedPath> {
        io::create_dir_all(dir)?;
        let path = self.unique_path(dir);
        io::write_atomic(&path, text.as_bytes(), RobustnessConfig::default())?;
        Ok(path)
    }

    /// Reports accumulate, so a same-second rerun gets a numeric suffix.
    fn unique_path(&self, dir: &NormalizedPath) -> NormalizedPath {
        let first = dir.join(&self.file_name());
        if !first.exists() {
            return first;
        }
        let stem = format!("{}{}", REPORT_PREFIX, self.started.format("%Y%m%d_%H%M%S"));
        (1..MAX_SUFFIX)
            .map(|n| dir.join(&format!("{}_{}.txt", stem, n)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}
