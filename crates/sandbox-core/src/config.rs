//! Host configuration and well-known application paths
//!
//! [`AppPaths`] is the path service the engine relies on. Defaults come from
//! the running executable and the user's desktop; a [`SandboxConfig`] file
//! can override any of them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sandbox_fs::{ConfigStore, NormalizedPath, SandboxPath};
use sandbox_tools::{ToolAliases, ToolSearchPaths};
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Optional overrides, loaded from TOML, JSON or YAML.
///
/// Relative paths resolve against the application base directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Manifest document; defaults to `manifest.json` in the asset root
    pub manifest: Option<PathBuf>,
    pub sandbox_root: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub asset_root: Option<PathBuf>,
    /// Extra tool search roots, tried before the development build trees
    pub tool_fallbacks: Vec<PathBuf>,
    /// Shortcut stem to tool name, merged over the stock aliases
    pub tool_aliases: BTreeMap<String, String>,
    pub shortcut_description: Option<String>,
}

impl SandboxConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        debug!(path = %path.display(), "Loaded sandbox config");
        Ok(config)
    }
}

/// Resolved locations for one host installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory the application runs from
    pub base_dir: PathBuf,
    /// Read-only asset tree `source` entries resolve against
    pub asset_root: PathBuf,
    pub manifest_path: PathBuf,
    /// The sandbox directory being kept in compliance
    pub sandbox_root: PathBuf,
    pub report_dir: PathBuf,
    pub tool_search: ToolSearchPaths,
    /// Tools for shortcut entries that declare no `target`
    pub tool_aliases: ToolAliases,
    pub shortcut_description: Option<String>,
}

impl AppPaths {
    /// Defaults for the running executable and the current user's desktop.
    pub fn discover() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let exe = dunce::canonicalize(&exe).unwrap_or(exe);
        let base_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::LocationUnavailable {
                what: "application".into(),
            })?;
        let desktop = dirs::desktop_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
            .ok_or_else(|| Error::LocationUnavailable {
                what: "desktop".into(),
            })?;
        Ok(Self::for_base_dir(&base_dir, &desktop))
    }

    /// Default layout for an application installed in `base_dir`.
    pub fn for_base_dir(base_dir: &Path, desktop: &Path) -> Self {
        let asset_root = base_dir.join(SandboxPath::AssetsDir.as_str());
        Self {
            base_dir: base_dir.to_path_buf(),
            manifest_path: asset_root.join(SandboxPath::ManifestFile.as_str()),
            asset_root,
            sandbox_root: desktop.join(SandboxPath::DefaultSandboxDir.as_str()),
            report_dir: base_dir.join(SandboxPath::ReportDir.as_str()),
            tool_search: ToolSearchPaths::for_base_dir(base_dir),
            tool_aliases: ToolAliases::default(),
            shortcut_description: None,
        }
    }

    /// Apply `config` on top of these paths.
    ///
    /// Overriding the asset root moves the manifest with it only while the
    /// manifest is still at its default spot under the old asset root, so a
    /// manifest set by an earlier layer survives a later `asset_root`.
    pub fn with_config(mut self, config: &SandboxConfig) -> Self {
        let base = self.base_dir.clone();

        if let Some(asset_root) = &config.asset_root {
            let default_manifest = self.asset_root.join(SandboxPath::ManifestFile.as_str());
            self.asset_root = resolve_against(&base, asset_root);
            if self.manifest_path == default_manifest {
                self.manifest_path = self.asset_root.join(SandboxPath::ManifestFile.as_str());
            }
        }
        if let Some(manifest) = &config.manifest {
            self.manifest_path = resolve_against(&base, manifest);
        }
        if let Some(sandbox_root) = &config.sandbox_root {
            self.sandbox_root = resolve_against(&base, sandbox_root);
        }
        if let Some(report_dir) = &config.report_dir {
            self.report_dir = resolve_against(&base, report_dir);
        }
        if !config.tool_fallbacks.is_empty() {
            let mut fallbacks: Vec<PathBuf> = config
                .tool_fallbacks
                .iter()
                .map(|root| resolve_against(&base, root))
                .collect();
            fallbacks.retain(|root| root != &self.tool_search.packaged);
            for existing in self.tool_search.fallbacks.drain(..) {
                if !fallbacks.contains(&existing) {
                    fallbacks.push(existing);
                }
            }
            self.tool_search.fallbacks = fallbacks;
        }
        for (stem, tool) in &config.tool_aliases {
            self.tool_aliases.insert(stem, tool.as_str());
        }
        if let Some(description) = &config.shortcut_description {
            self.shortcut_description = Some(description.clone());
        }
        self
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
