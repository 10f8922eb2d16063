//! [`TestSandbox`] builder for integrity scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary application install and sandbox, laid out like a real host:
///
/// ```text
/// <tmp>/app/                    base dir (packaged tools live here)
/// <tmp>/app/Assets/             asset root, manifest.json
/// <tmp>/app/FileValidation/     report dir (not created up front)
/// <tmp>/desktop/Office Work Stuff/   sandbox root (created empty)
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use sandbox_test_utils::TestSandbox;
///
/// let sandbox = TestSandbox::new();
/// sandbox.write_manifest(r#"[{"kind": "directory", "path": "Notes"}]"#);
/// sandbox.assert_missing("Notes");
/// ```
pub struct TestSandbox {
    temp_dir: TempDir,
}

impl Default for TestSandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSandbox {
    pub fn new() -> Self {
        let sandbox = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(sandbox.asset_root()).unwrap();
        fs::create_dir_all(sandbox.sandbox_root()).unwrap();
        sandbox
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn base_dir(&self) -> PathBuf {
        self.root().join("app")
    }

    pub fn asset_root(&self) -> PathBuf {
        self.base_dir().join("Assets")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.asset_root().join("manifest.json")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.base_dir().join("FileValidation")
    }

    pub fn desktop(&self) -> PathBuf {
        self.root().join("desktop")
    }

    pub fn sandbox_root(&self) -> PathBuf {
        self.desktop().join("Office Work Stuff")
    }

    /// Absolute path of `relative` inside the sandbox.
    pub fn sandbox_path(&self, relative: &str) -> PathBuf {
        self.sandbox_root().join(relative)
    }

    /// Write `manifest.json` verbatim.
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        let path = self.manifest_path();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `manifest.json` from a JSON value.
    pub fn write_manifest_json(&self, value: &serde_json::Value) -> PathBuf {
        self.write_manifest(&serde_json::to_string_pretty(value).unwrap())
    }

    /// Write a manifest under another name (e.g. `manifest.toml`).
    pub fn write_manifest_named(&self, name: &str, content: &str) -> PathBuf {
        let path = self.asset_root().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Place an asset file under the asset root.
    pub fn add_asset(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.asset_root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Place a companion tool executable in the packaged location.
    pub fn add_tool(&self, name: &str) -> PathBuf {
        self.add_tool_in(&self.base_dir(), name)
    }

    /// Place a companion tool executable in `dir`.
    pub fn add_tool_in(&self, dir: &Path, name: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    /// Create something inside the sandbox ahead of a run.
    pub fn create_sandbox_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.sandbox_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn create_sandbox_dir(&self, relative: &str) -> PathBuf {
        let path = self.sandbox_path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn read_sandbox_file(&self, relative: &str) -> String {
        fs::read_to_string(self.sandbox_path(relative)).unwrap()
    }

    /// Timestamped reports in the report dir, oldest name first.
    pub fn report_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.report_dir()) else {
            return Vec::new();
        };
        let mut reports: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("integrity_") && n.ends_with(".txt"))
            })
            .collect();
        reports.sort();
        reports
    }

    /// Assert a regular file exists inside the sandbox.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.sandbox_path(relative);
        assert!(path.is_file(), "Expected file to exist: {}", path.display());
    }

    /// Assert a directory exists inside the sandbox.
    pub fn assert_dir_exists(&self, relative: &str) {
        let path = self.sandbox_path(relative);
        assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
    }

    /// Assert nothing (not even a dangling link) exists at `relative`.
    pub fn assert_missing(&self, relative: &str) {
        let path = self.sandbox_path(relative);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected nothing at: {}",
            path.display()
        );
    }
}
