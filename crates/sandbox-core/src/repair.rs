//! Per-kind repair strategies
//!
//! [`repair`] is the failure boundary: whatever happens inside a strategy,
//! including a panic in a shortcut writer, comes back as a
//! [`RepairOutcome`] with `succeeded == false`.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use sandbox_fs::{NormalizedPath, RobustnessConfig, checksum, io, validate_relative_path};
use sandbox_manifest::EntryKind;
use sandbox_tools::{ShortcutWriter, ToolAliases, ToolResolver};
use serde::Serialize;
use tracing::{debug, warn};

use crate::Result;
use crate::reconcile::Discrepancy;

/// Built-in content for a missing `README.txt` with no declared source.
pub const DEFAULT_README: &str = "OFFICE OF SHADOWS

This folder is where your investigation tools, notes, and clues will appear.

If anything here goes missing, it is rebuilt the next time the game starts.
Reopen the game to restore critical files and shortcuts.
";

const README_NAME: &str = "README.txt";

/// Result of attempting to resolve one discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    pub succeeded: bool,
    /// What was attempted and why it did or did not work
    pub narrative: Vec<String>,
}

impl RepairOutcome {
    pub fn success(line: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            narrative: vec![line.into()],
        }
    }

    pub fn failure(line: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            narrative: vec![line.into()],
        }
    }
}

/// Collaborators a repair may need.
pub struct RepairContext<'a> {
    /// Root of the read-only asset tree `source` paths resolve against
    pub asset_root: &'a NormalizedPath,
    pub resolver: &'a ToolResolver,
    /// Tool names for shortcuts that declare no `target`
    pub tool_aliases: &'a ToolAliases,
    pub writer: &'a dyn ShortcutWriter,
    /// Used when a shortcut entry declares no description
    pub default_description: Option<&'a str>,
}

/// Brings one kind of discrepancy into compliance.
pub trait RepairStrategy: Sync {
    fn kind(&self) -> EntryKind;

    /// Attempt the repair. Expected failures (missing asset, unresolvable
    /// tool) are `Ok` outcomes; `Err` is reserved for filesystem refusals.
    fn apply(&self, discrepancy: &Discrepancy<'_>, ctx: &RepairContext<'_>) -> Result<RepairOutcome>;
}

/// Creates the directory and any missing parents.
pub struct DirectoryRepair;

impl RepairStrategy for DirectoryRepair {
    fn kind(&self) -> EntryKind {
        EntryKind::Directory
    }

    fn apply(&self, discrepancy: &Discrepancy<'_>, _ctx: &RepairContext<'_>) -> Result<RepairOutcome> {
        io::create_dir_all(&discrepancy.absolute_path)?;
        Ok(RepairOutcome::success("Repaired: Created directory."))
    }
}

/// Provisions file content from an asset, declared content, or a built-in default.
///
/// An explicit `source` is authoritative: when the asset is missing the
/// repair fails rather than falling back to other content.
pub struct FileRepair;

impl RepairStrategy for FileRepair {
    fn kind(&self) -> EntryKind {
        EntryKind::File
    }

    fn apply(&self, discrepancy: &Discrepancy<'_>, ctx: &RepairContext<'_>) -> Result<RepairOutcome> {
        let entry = discrepancy.entry;
        let dest = &discrepancy.absolute_path;

        if let Some(source) = &entry.source {
            let relative = match validate_relative_path(source) {
                Ok(p) => p,
                Err(reason) => {
                    return Ok(RepairOutcome::failure(format!(
                        "Could not repair: Invalid source '{}': {}",
                        source, reason
                    )));
                }
            };
            let asset = match locate_asset(ctx.asset_root, &relative) {
                Ok(asset) => asset,
                Err(tried) => {
                    return Ok(RepairOutcome::failure(format!(
                        "Could not repair: Source not found: {}",
                        tried
                    )));
                }
            };
            io::copy_file(&asset, dest)?;
            let sum = checksum::compute_file_checksum(&dest.to_native())?;
            return Ok(RepairOutcome::success(format!(
                "Repaired: Copied from {} ({})",
                source,
                checksum::short(&sum)
            )));
        }

        if let Some(content) = &entry.content {
            write_content(dest, content)?;
            let sum = checksum::compute_content_checksum(content.as_bytes());
            return Ok(RepairOutcome::success(format!(
                "Repaired: Wrote declared content ({})",
                checksum::short(&sum)
            )));
        }

        if dest
            .file_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(README_NAME))
        {
            write_content(dest, DEFAULT_README)?;
            return Ok(RepairOutcome::success("Repaired: Regenerated README content."));
        }

        Ok(RepairOutcome::failure(
            "Could not repair: No repair source specified.",
        ))
    }
}

/// Find `relative` under the asset root.
///
/// A source may also be written relative to the application directory, as
/// `Assets/<file>`; a leading segment naming the asset root itself is then
/// dropped. On failure returns the last location tried.
fn locate_asset(
    asset_root: &NormalizedPath,
    relative: &str,
) -> std::result::Result<NormalizedPath, NormalizedPath> {
    let direct = asset_root.join(relative);
    if direct.is_file() {
        return Ok(direct);
    }
    let nested = asset_root.file_name().and_then(|root_name| {
        relative
            .split_once('/')
            .filter(|(first, rest)| first.eq_ignore_ascii_case(root_name) && !rest.is_empty())
            .map(|(_, rest)| asset_root.join(rest))
    });
    match nested {
        Some(candidate) if candidate.is_file() => Ok(candidate),
        Some(candidate) => Err(candidate),
        None => Err(direct),
    }
}

fn write_content(dest: &NormalizedPath, content: &str) -> Result<()> {
    io::write_atomic(dest, content.as_bytes(), RobustnessConfig::default())?;
    Ok(())
}

/// Recreates a shortcut to a resolved companion tool.
///
/// The tool is the entry's `target`. Without one, the link's file stem is
/// looked up in the tool aliases and used as-is when no alias matches.
pub struct ShortcutRepair;

impl RepairStrategy for ShortcutRepair {
    fn kind(&self) -> EntryKind {
        EntryKind::Shortcut
    }

    fn apply(&self, discrepancy: &Discrepancy<'_>, ctx: &RepairContext<'_>) -> Result<RepairOutcome> {
        let entry = discrepancy.entry;
        let tool = match entry.target.as_deref().or_else(|| {
            discrepancy
                .absolute_path
                .file_stem()
                .map(|stem| ctx.tool_aliases.tool_for(stem))
        }) {
            Some(tool) => tool,
            None => {
                return Ok(RepairOutcome::failure(
                    "Could not repair: No target tool declared.",
                ));
            }
        };

        let Some(exe) = ctx.resolver.resolve(tool) else {
            return Ok(RepairOutcome::failure(format!(
                "Could not repair: Target executable not found: {}",
                tool
            )));
        };

        let working_dir = exe.parent().unwrap_or_else(|| Path::new(""));
        let description = entry.description.as_deref().or(ctx.default_description);
        ctx.writer.create(
            &exe,
            &discrepancy.absolute_path.to_native(),
            working_dir,
            description,
        )?;

        Ok(RepairOutcome::success(format!(
            "Repaired: Recreated shortcut to {} ({}).",
            exe.display(),
            ctx.writer.name()
        )))
    }
}

static STRATEGIES: [&dyn RepairStrategy; 3] = [&DirectoryRepair, &FileRepair, &ShortcutRepair];

/// The strategy for `kind`; none exists for unknown kinds.
pub fn strategy_for(kind: &EntryKind) -> Option<&'static dyn RepairStrategy> {
    STRATEGIES.iter().copied().find(|s| &s.kind() == kind)
}

/// Attempt to repair one discrepancy. Never fails and never panics outward.
pub fn repair(discrepancy: &Discrepancy<'_>, ctx: &RepairContext<'_>) -> RepairOutcome {
    let Some(strategy) = strategy_for(&discrepancy.entry.kind) else {
        return RepairOutcome::failure("Skipped: no repair strategy for this kind.");
    };

    let outcome = match catch_unwind(AssertUnwindSafe(|| strategy.apply(discrepancy, ctx))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => RepairOutcome::failure(format!("Repair failed: {}", e)),
        Err(panic) => RepairOutcome::failure(format!("Repair failed: {}", panic_message(&*panic))),
    };

    if outcome.succeeded {
        debug!(path = %discrepancy.relative_path, "Repaired");
    } else {
        warn!(
            path = %discrepancy.relative_path,
            reason = %outcome.narrative.join(" "),
            "Repair did not succeed"
        );
    }
    outcome
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_kind_has_a_strategy() {
        for kind in [EntryKind::Directory, EntryKind::File, EntryKind::Shortcut] {
            assert_eq!(strategy_for(&kind).map(|s| s.kind()), Some(kind));
        }
        assert!(strategy_for(&EntryKind::Unknown("x".into())).is_none());
    }

    #[test]
    fn asset_root_prefix_is_dropped_only_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let root = NormalizedPath::new(dir.path().join("Assets"));
        std::fs::create_dir_all(dir.path().join("Assets/Assets")).unwrap();
        std::fs::write(dir.path().join("Assets/map.png"), "top").unwrap();
        std::fs::write(dir.path().join("Assets/Assets/map.png"), "nested").unwrap();

        assert_eq!(locate_asset(&root, "Assets/map.png"), Ok(root.join("Assets/map.png")));
        assert_eq!(locate_asset(&root, "assets/missing.png"), Err(root.join("missing.png")));
        assert_eq!(locate_asset(&root, "other/missing.png"), Err(root.join("other/missing.png")));
    }

    #[test]
    fn panic_message_extracts_strings() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*boxed), "bang");
    }
}
