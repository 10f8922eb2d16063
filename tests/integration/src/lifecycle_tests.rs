//! Lifecycle scenarios across the whole stack
//!
//! Each scenario drives a host-style startup: resolve paths, build the
//! service once, run it repeatedly while the sandbox is damaged in between.

use std::fs;

use pretty_assertions::assert_eq;
use sandbox_core::{AppPaths, IntegrityService, RunStatus, SandboxConfig};
use sandbox_fs::checksum;
use sandbox_test_utils::TestSandbox;
use sandbox_tools::{DesktopEntryWriter, ToolResolver};

fn host(fixture: &TestSandbox, config: &SandboxConfig) -> (AppPaths, IntegrityService) {
    let paths = AppPaths::for_base_dir(&fixture.base_dir(), &fixture.desktop()).with_config(config);
    let mut service = IntegrityService::new(
        &paths.asset_root,
        ToolResolver::new(paths.tool_search.clone()),
        Box::new(DesktopEntryWriter),
    );
    if let Some(description) = &paths.shortcut_description {
        service = service.with_shortcut_description(description.clone());
    }
    (paths, service)
}

const GAME_MANIFEST: &str = r#"
version = 1

[[items]]
kind = "directory"
path = "Notes"

[[items]]
Kind = "File"
Path = "README.txt"

[[items]]
kind = "file"
path = "Cases/case-01.txt"
source = "Cases/case-01.txt"

[[items]]
kind = "shortcut"
path = "Terminal.desktop"
target = "OOS.Terminal"
"#;

#[test]
fn test_damage_and_recover_across_runs() {
    let fixture = TestSandbox::new();
    fixture.add_asset("Cases/case-01.txt", "Victim last seen at the docks.");
    fixture.add_tool("OOS.Terminal");
    let manifest = fixture.write_manifest_named("manifest.toml", GAME_MANIFEST);
    let config = SandboxConfig {
        manifest: Some(manifest),
        shortcut_description: Some("Office of Shadows terminal".into()),
        ..Default::default()
    };
    let (paths, service) = host(&fixture, &config);

    let first = service.run_configured(&paths);
    assert_eq!(first.issue_count, 4);
    assert_eq!(first.status(), RunStatus::Repaired);

    let second = service.run_configured(&paths);
    assert_eq!(second.status(), RunStatus::Compliant);

    // The player deletes things between sessions
    fs::remove_dir_all(fixture.sandbox_path("Notes")).unwrap();
    fs::remove_file(fixture.sandbox_path("Terminal.desktop")).unwrap();

    let third = service.run_configured(&paths);
    let repaired: Vec<&str> = third.repairs.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(repaired, vec!["Notes", "Terminal.desktop"]);
    assert_eq!(third.status(), RunStatus::Repaired);
    assert!(
        fixture
            .read_sandbox_file("Terminal.desktop")
            .contains("Comment=Office of Shadows terminal")
    );

    assert_eq!(fixture.report_files().len(), 3);
}

#[test]
fn test_copied_asset_matches_source_checksum() {
    let fixture = TestSandbox::new();
    let asset = fixture.add_asset("Cases/case-01.txt", "Victim last seen at the docks.");
    fixture.write_manifest(r#"{"items": [{"kind": "file", "path": "case.txt", "source": "Cases/case-01.txt"}]}"#);
    let (paths, service) = host(&fixture, &SandboxConfig::default());

    let result = service.run_configured(&paths);
    let narrative = &result.repairs[0].outcome.narrative[0];

    let expected = checksum::compute_file_checksum(&asset).unwrap();
    assert!(narrative.contains(checksum::short(&expected)), "{narrative}");
    assert_eq!(
        checksum::compute_file_checksum(&fixture.sandbox_path("case.txt")).unwrap(),
        expected
    );
}

#[test]
fn test_user_content_is_never_overwritten() {
    let fixture = TestSandbox::new();
    fixture.create_sandbox_file("README.txt", "my own notes");
    fixture.create_sandbox_file("Notes/diary.txt", "day 1");
    fixture.write_manifest(r#"[{"kind": "file", "path": "README.txt"}, {"kind": "directory", "path": "Notes"}]"#);
    let (paths, service) = host(&fixture, &SandboxConfig::default());

    let result = service.run_configured(&paths);
    assert_eq!(result.status(), RunStatus::Compliant);
    assert_eq!(fixture.read_sandbox_file("README.txt"), "my own notes");
    assert_eq!(fixture.read_sandbox_file("Notes/diary.txt"), "day 1");
}

#[test]
fn test_manifest_fixed_after_fatal_run() {
    let fixture = TestSandbox::new();
    fixture.write_manifest("{\"items\": 42}");
    let (paths, service) = host(&fixture, &SandboxConfig::default());

    assert_eq!(service.run_configured(&paths).status(), RunStatus::ManifestFatal);

    fixture.write_manifest(r#"{"items": [{"kind": "directory", "path": "Notes"}]}"#);
    let recovered = service.run_configured(&paths);
    assert_eq!(recovered.status(), RunStatus::Repaired);
    fixture.assert_dir_exists("Notes");
}

#[test]
fn test_missing_sandbox_root_is_created_by_repair() {
    let fixture = TestSandbox::new();
    fs::remove_dir_all(fixture.sandbox_root()).unwrap();
    fixture.write_manifest(r#"[{"kind": "directory", "path": "Notes/Inbox"}]"#);
    let (paths, service) = host(&fixture, &SandboxConfig::default());

    let result = service.run_configured(&paths);
    assert_eq!(result.status(), RunStatus::Repaired);
    fixture.assert_dir_exists("Notes/Inbox");
}
