//! Comparison of the declared manifest against the sandbox on disk
//!
//! Reconciliation only reads. It can be re-run from scratch at any time and
//! yields findings in manifest declaration order.

use std::fmt;

use sandbox_fs::{NormalizedPath, validate_relative_path};
use sandbox_manifest::{EntryKind, ManifestEntry};

use crate::probe::{ProbeState, WorkspaceProbe};

/// Why a declared entry is out of compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscrepancyCategory {
    /// The entry is absent, or present with the wrong kind
    Missing,
}

impl fmt::Display for DiscrepancyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
        }
    }
}

/// A declared entry found out of compliance.
#[derive(Debug, Clone)]
pub struct Discrepancy<'a> {
    /// The originating declaration
    pub entry: &'a ManifestEntry,
    pub category: DiscrepancyCategory,
    /// Validated, normalized path relative to the sandbox root
    pub relative_path: String,
    /// Absolute path under the sandbox root
    pub absolute_path: NormalizedPath,
    /// Set when something of the wrong kind occupies the path
    pub detail: Option<String>,
}

/// A declared entry that cannot be reconciled at all.
///
/// Warnings are reported but never repaired or counted as issues.
#[derive(Debug, Clone)]
pub struct EntryWarning<'a> {
    pub entry: &'a ManifestEntry,
    pub reason: String,
}

/// One reconciliation result; compliant entries produce none.
#[derive(Debug, Clone)]
pub enum Finding<'a> {
    Discrepancy(Discrepancy<'a>),
    Warning(EntryWarning<'a>),
}

/// Reconcile every entry against `root`, lazily and in declaration order.
pub fn reconcile<'a>(
    entries: &'a [ManifestEntry],
    root: &'a NormalizedPath,
) -> impl Iterator<Item = Finding<'a>> + 'a {
    entries
        .iter()
        .filter_map(move |entry| reconcile_entry(entry, root))
}

/// Reconcile a single entry; `None` means compliant.
pub fn reconcile_entry<'a>(entry: &'a ManifestEntry, root: &NormalizedPath) -> Option<Finding<'a>> {
    if let EntryKind::Unknown(raw) = &entry.kind {
        let reason = if raw.is_empty() {
            "no kind declared; entry skipped".to_string()
        } else {
            format!("unknown kind '{}'; entry skipped", raw)
        };
        return Some(Finding::Warning(EntryWarning { entry, reason }));
    }

    let relative_path = match validate_relative_path(&entry.path) {
        Ok(p) => p,
        Err(reason) => {
            return Some(Finding::Warning(EntryWarning {
                entry,
                reason: format!("{}; entry skipped", reason),
            }));
        }
    };

    let absolute_path = root.join(&relative_path);
    let state = WorkspaceProbe::probe(&absolute_path);
    if WorkspaceProbe::satisfies(&entry.kind, state) {
        return None;
    }

    let detail = match state {
        ProbeState::Absent => None,
        _ => Some(format!("exists but is not a {}", entry.kind)),
    };

    Some(Finding::Discrepancy(Discrepancy {
        entry,
        category: DiscrepancyCategory::Missing,
        relative_path,
        absolute_path,
        detail,
    }))
}

/// Only the discrepancies from a reconciliation pass.
pub fn discrepancies<'a>(
    entries: &'a [ManifestEntry],
    root: &'a NormalizedPath,
) -> impl Iterator<Item = Discrepancy<'a>> + 'a {
    reconcile(entries, root).filter_map(|finding| match finding {
        Finding::Discrepancy(d) => Some(d),
        Finding::Warning(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn wrong_kind_is_missing_with_detail() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Notes"), "not a folder").unwrap();
        let root = NormalizedPath::new(temp.path());
        let entry = ManifestEntry::directory("Notes");

        let Some(Finding::Discrepancy(d)) = reconcile_entry(&entry, &root) else {
            panic!("expected a discrepancy");
        };
        assert_eq!(d.category, DiscrepancyCategory::Missing);
        assert_eq!(d.detail.as_deref(), Some("exists but is not a directory"));
    }

    #[test]
    fn escaping_path_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path());
        let entry = ManifestEntry::file("../outside.txt");

        let Some(Finding::Warning(w)) = reconcile_entry(&entry, &root) else {
            panic!("expected a warning");
        };
        assert!(w.reason.contains("escapes"));
    }
}
