//! Tests for the per-kind repair strategies

use pretty_assertions::assert_eq;
use sandbox_core::{
    DEFAULT_README, Discrepancy, DiscrepancyCategory, RepairContext, RepairOutcome, repair,
};
use sandbox_fs::NormalizedPath;
use sandbox_manifest::{EntryKind, ManifestEntry};
use sandbox_test_utils::TestSandbox;
use sandbox_tools::{DesktopEntryWriter, ToolAliases, ToolResolver, ToolSearchPaths};

struct Fixture {
    sandbox: TestSandbox,
    asset_root: NormalizedPath,
    root: NormalizedPath,
    resolver: ToolResolver,
    aliases: ToolAliases,
    writer: DesktopEntryWriter,
}

impl Fixture {
    fn new() -> Self {
        let sandbox = TestSandbox::new();
        Self {
            asset_root: NormalizedPath::new(sandbox.asset_root()),
            root: NormalizedPath::new(sandbox.sandbox_root()),
            resolver: ToolResolver::new(ToolSearchPaths::new(sandbox.base_dir())),
            aliases: ToolAliases::default(),
            writer: DesktopEntryWriter,
            sandbox,
        }
    }

    fn repair(&self, entry: &ManifestEntry) -> RepairOutcome {
        let relative_path = entry.path.clone();
        let discrepancy = Discrepancy {
            entry,
            category: DiscrepancyCategory::Missing,
            absolute_path: self.root.join(&relative_path),
            relative_path,
            detail: None,
        };
        let ctx = RepairContext {
            asset_root: &self.asset_root,
            resolver: &self.resolver,
            tool_aliases: &self.aliases,
            writer: &self.writer,
            default_description: None,
        };
        repair(&discrepancy, &ctx)
    }
}

#[test]
fn test_directory_creates_missing_parents() {
    let fx = Fixture::new();
    let outcome = fx.repair(&ManifestEntry::directory("Cases/2024/Closed"));
    assert_eq!(outcome, RepairOutcome::success("Repaired: Created directory."));
    fx.sandbox.assert_dir_exists("Cases/2024/Closed");
}

#[test]
fn test_source_wins_over_content() {
    let fx = Fixture::new();
    fx.sandbox.add_asset("letter.txt", "from the archive");
    let entry = ManifestEntry::file("letter.txt")
        .with_source("letter.txt")
        .with_content("inline");

    assert!(fx.repair(&entry).succeeded);
    assert_eq!(fx.sandbox.read_sandbox_file("letter.txt"), "from the archive");
}

#[test]
fn test_copy_overwrites_and_creates_parents() {
    let fx = Fixture::new();
    fx.sandbox.add_asset("docs/map.txt", "north");
    let entry = ManifestEntry::file("deep/nested/map.txt").with_source("docs/map.txt");

    assert!(fx.repair(&entry).succeeded);
    assert_eq!(fx.sandbox.read_sandbox_file("deep/nested/map.txt"), "north");
}

#[test]
fn test_source_escaping_asset_root_is_refused() {
    let fx = Fixture::new();
    fx.sandbox.create_sandbox_file("secret.txt", "x");
    let entry = ManifestEntry::file("copy.txt").with_source("../../desktop/secret.txt");

    let outcome = fx.repair(&entry);
    assert!(!outcome.succeeded);
    assert!(outcome.narrative[0].starts_with("Could not repair: Invalid source"));
    fx.sandbox.assert_missing("copy.txt");
}

#[test]
fn test_empty_declared_content_is_written() {
    let fx = Fixture::new();
    let outcome = fx.repair(&ManifestEntry::file("blank.txt").with_content(""));
    assert!(outcome.succeeded);
    assert_eq!(fx.sandbox.read_sandbox_file("blank.txt"), "");
}

#[test]
fn test_readme_default_is_case_insensitive() {
    let fx = Fixture::new();
    let outcome = fx.repair(&ManifestEntry::file("Docs/readme.TXT"));
    assert_eq!(outcome, RepairOutcome::success("Repaired: Regenerated README content."));
    assert_eq!(fx.sandbox.read_sandbox_file("Docs/readme.TXT"), DEFAULT_README);
}

#[test]
fn test_declared_content_beats_readme_default() {
    let fx = Fixture::new();
    assert!(fx.repair(&ManifestEntry::file("README.txt").with_content("custom")).succeeded);
    assert_eq!(fx.sandbox.read_sandbox_file("README.txt"), "custom");
}

#[test]
fn test_shortcut_resolved_from_fallback_tree() {
    let fx = Fixture::new();
    let resolver = ToolResolver::new(
        ToolSearchPaths::new(fx.sandbox.base_dir()).with_fallback(fx.sandbox.root().join("build")),
    );
    fx.sandbox
        .add_tool_in(&fx.sandbox.root().join("build/Scanner"), "Scanner");

    let entry = ManifestEntry::shortcut("Scanner.desktop", "Scanner");
    let relative_path = entry.path.clone();
    let discrepancy = Discrepancy {
        entry: &entry,
        category: DiscrepancyCategory::Missing,
        absolute_path: fx.root.join(&relative_path),
        relative_path,
        detail: None,
    };
    let ctx = RepairContext {
        asset_root: &fx.asset_root,
        resolver: &resolver,
        tool_aliases: &fx.aliases,
        writer: &fx.writer,
        default_description: Some("Scans evidence"),
    };

    let outcome = repair(&discrepancy, &ctx);
    assert!(outcome.succeeded, "{:?}", outcome.narrative);
    assert!(outcome.narrative[0].ends_with("(desktop-entry)."));
    assert!(fx.sandbox.read_sandbox_file("Scanner.desktop").contains("Comment=Scans evidence"));
}

#[test]
fn test_shortcut_replaces_corrupt_link() {
    let fx = Fixture::new();
    fx.sandbox.add_tool("Decoder");
    fx.sandbox.create_sandbox_file("Decoder.desktop", "garbage");

    assert!(fx.repair(&ManifestEntry::shortcut("Decoder.desktop", "Decoder")).succeeded);
    assert!(fx.sandbox.read_sandbox_file("Decoder.desktop").starts_with("[Desktop Entry]"));
}

#[test]
fn test_unknown_kind_is_skipped() {
    let fx = Fixture::new();
    let outcome = fx.repair(&ManifestEntry::new(EntryKind::Unknown("gizmo".into()), "g"));
    assert_eq!(outcome, RepairOutcome::failure("Skipped: no repair strategy for this kind."));
    fx.sandbox.assert_missing("g");
}

#[test]
fn test_legacy_shortcut_stem_maps_to_stock_tool() {
    let fx = Fixture::new();
    fx.sandbox.add_tool("OOS.VPN");
    let entry = ManifestEntry::new(EntryKind::Shortcut, "vpn.desktop");

    let outcome = fx.repair(&entry);
    assert!(outcome.succeeded, "{:?}", outcome.narrative);
    assert!(outcome.narrative[0].contains("OOS.VPN"));
}

#[test]
fn test_source_relative_to_application_dir() {
    let fx = Fixture::new();
    fx.sandbox.add_asset("map.png", "north-east");
    let entry = ManifestEntry::file("Clues/map.png").with_source("Assets/map.png");

    assert!(fx.repair(&entry).succeeded);
    assert_eq!(fx.sandbox.read_sandbox_file("Clues/map.png"), "north-east");
}
