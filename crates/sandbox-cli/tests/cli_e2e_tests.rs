//! CLI end-to-end tests that invoke the compiled `sandbox` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use sandbox_test_utils::TestSandbox;
use serde_json::{Value, json};

/// A `sandbox` command pointed at the fixture's locations.
fn sandbox_cmd(fixture: &TestSandbox) -> Command {
    let mut cmd = Command::cargo_bin("sandbox").expect("Failed to find sandbox binary");
    for var in [
        "SANDBOX_CONFIG",
        "SANDBOX_MANIFEST",
        "SANDBOX_ROOT",
        "SANDBOX_REPORT_DIR",
        "SANDBOX_ASSETS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1")
        .arg("--manifest")
        .arg(fixture.manifest_path())
        .arg("--sandbox")
        .arg(fixture.sandbox_root())
        .arg("--report-dir")
        .arg(fixture.report_dir())
        .arg("--assets")
        .arg(fixture.asset_root());
    cmd
}

fn notes_and_readme(fixture: &TestSandbox) {
    fixture.write_manifest_json(&json!([
        {"kind": "directory", "path": "Notes"},
        {"kind": "file", "path": "README.txt"}
    ]));
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("sandbox")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repair"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_repair_restores_sandbox() {
    let fixture = TestSandbox::new();
    notes_and_readme(&fixture);

    sandbox_cmd(&fixture)
        .arg("repair")
        .assert()
        .success()
        .stdout(predicate::str::contains("Notes (directory): Repaired: Created directory."))
        .stdout(predicate::str::contains("Repaired 2 issue(s)."))
        .stdout(predicate::str::contains("Report: "));

    fixture.assert_dir_exists("Notes");
    fixture.assert_file_exists("README.txt");
    assert_eq!(fixture.report_files().len(), 1);
}

#[test]
fn test_check_is_read_only_and_signals_drift() {
    let fixture = TestSandbox::new();
    notes_and_readme(&fixture);

    sandbox_cmd(&fixture)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 item(s) missing"))
        .stdout(predicate::str::contains("sandbox repair"));
    fixture.assert_missing("Notes");
    assert!(fixture.report_files().is_empty());

    sandbox_cmd(&fixture).arg("repair").assert().success();
    sandbox_cmd(&fixture)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All items match the manifest."));
}

#[test]
fn test_repair_json_output() {
    let fixture = TestSandbox::new();
    fixture.write_manifest_json(&json!([
        {"kind": "directory", "path": "Notes"},
        {"kind": "file", "path": "missing.txt", "source": "nowhere.txt"}
    ]));

    let output = sandbox_cmd(&fixture)
        .args(["repair", "--json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let result: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["issue_count"], json!(2));
    assert_eq!(result["repaired"], json!(1));
    assert_eq!(result["manifest_found"], json!(true));
    assert_eq!(result["repairs"][1]["outcome"]["succeeded"], json!(false));
}

#[test]
fn test_repair_without_manifest_reports_sentinel() {
    let fixture = TestSandbox::new();

    let output = sandbox_cmd(&fixture)
        .args(["repair", "--json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let result: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["issue_count"], json!(-1));
    assert_eq!(result["manifest_found"], json!(false));

    let report = fs::read_to_string(result["report_path"].as_str().unwrap()).unwrap();
    assert!(report.contains("ERROR: Manifest not found. Skipping validation."));
}

#[test]
fn test_check_with_broken_manifest_is_an_error() {
    let fixture = TestSandbox::new();
    fixture.write_manifest("[{\"kind\": \"file\"}]");

    sandbox_cmd(&fixture)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be parsed"));
}

#[test]
fn test_resolve_uses_configured_fallbacks() {
    let fixture = TestSandbox::new();
    let tools = fixture.root().join("build");
    fixture.add_tool_in(&tools.join("OOS.Terminal"), "OOS.Terminal");
    let config = fixture.root().join("sandbox.json");
    fs::write(
        &config,
        serde_json::to_string(&json!({"tool_fallbacks": [tools]})).unwrap(),
    )
    .unwrap();

    sandbox_cmd(&fixture)
        .arg("--config")
        .arg(&config)
        .args(["resolve", "OOS.Terminal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OOS.Terminal"));
}

#[test]
fn test_resolve_lists_candidates_when_missing() {
    let fixture = TestSandbox::new();

    sandbox_cmd(&fixture)
        .args(["resolve", "NoSuchTool"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Tool not found"))
        .stderr(predicate::str::contains("Tried:"));
}

#[test]
fn test_missing_config_file_is_reported() {
    let fixture = TestSandbox::new();

    sandbox_cmd(&fixture)
        .arg("--config")
        .arg(fixture.root().join("absent.toml"))
        .arg("paths")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_environment_overrides_sandbox_location() {
    let fixture = TestSandbox::new();
    let elsewhere = fixture.root().join("elsewhere");

    Command::cargo_bin("sandbox")
        .unwrap()
        .env("NO_COLOR", "1")
        .env("SANDBOX_ROOT", &elsewhere)
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains(elsewhere.display().to_string()))
        .stdout(predicate::str::contains("terminal -> OOS.Terminal"));
}

#[test]
fn test_assets_flag_keeps_manifest_from_config_file() {
    let fixture = TestSandbox::new();
    let manifest = fixture.root().join("custom/manifest.toml");
    let config = fixture.root().join("sandbox.json");
    fs::write(
        &config,
        serde_json::to_string(&json!({"manifest": manifest})).unwrap(),
    )
    .unwrap();

    Command::cargo_bin("sandbox")
        .unwrap()
        .env("NO_COLOR", "1")
        .env_remove("SANDBOX_MANIFEST")
        .env_remove("SANDBOX_ASSETS")
        .arg("--config")
        .arg(&config)
        .arg("--assets")
        .arg(fixture.root().join("other-assets"))
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains(manifest.display().to_string()))
        .stdout(predicate::str::contains("other-assets/manifest.json").not());
}
