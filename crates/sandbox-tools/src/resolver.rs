//! Companion tool resolution
//!
//! Search order, first match wins:
//!
//! 1. The packaged location beside the running application
//! 2. Each development fallback root, trying `<root>/<exe>` and then
//!    `<root>/<tool>/<exe>`
//!
//! Resolution never creates or modifies anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Where to look for companion executables.
///
/// Supplied by the host application's path service; the resolver never
/// decides install locations on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSearchPaths {
    /// Directory the application itself runs from
    pub packaged: PathBuf,
    /// Development build output trees, tried in order after `packaged`
    pub fallbacks: Vec<PathBuf>,
}

impl ToolSearchPaths {
    pub fn new(packaged: impl Into<PathBuf>) -> Self {
        Self {
            packaged: packaged.into(),
            fallbacks: Vec::new(),
        }
    }

    pub fn with_fallback(mut self, root: impl Into<PathBuf>) -> Self {
        self.fallbacks.push(root.into());
        self
    }

    /// Packaged location plus the sibling build trees of a development checkout.
    ///
    /// For an application running from `<out>/debug` this yields
    /// `<out>` (per-tool subdirectories), `<out>/release` and `<out>/debug`,
    /// skipping whichever is the packaged directory itself.
    pub fn for_base_dir(base_dir: &Path) -> Self {
        let mut paths = Self::new(base_dir);
        if let Some(out) = base_dir.parent() {
            for candidate in [out.to_path_buf(), out.join("release"), out.join("debug")] {
                if candidate != base_dir && !paths.fallbacks.contains(&candidate) {
                    paths.fallbacks.push(candidate);
                }
            }
        }
        paths
    }
}

/// Maps shortcut file stems to the tool they launch.
///
/// Keys compare case-insensitively. Seeded with the stock companion tools so
/// manifests that name a shortcut without a `target` still resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAliases {
    by_stem: BTreeMap<String, String>,
}

impl Default for ToolAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        aliases.insert("terminal", "OOS.Terminal");
        aliases.insert("vpn", "OOS.VPN");
        aliases.insert("email", "OOS.Email");
        aliases
    }
}

impl ToolAliases {
    pub fn empty() -> Self {
        Self {
            by_stem: BTreeMap::new(),
        }
    }

    /// Add or replace the tool for `stem`.
    pub fn insert(&mut self, stem: &str, tool: impl Into<String>) {
        self.by_stem.insert(stem.trim().to_lowercase(), tool.into());
    }

    pub fn get(&self, stem: &str) -> Option<&str> {
        self.by_stem.get(&stem.trim().to_lowercase()).map(String::as_str)
    }

    /// Tool for a link stem: its alias when one is known, else the stem itself.
    pub fn tool_for<'a>(&'a self, stem: &'a str) -> &'a str {
        self.get(stem).unwrap_or(stem)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_stem.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Locates companion tool executables by logical name.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    paths: ToolSearchPaths,
}

impl ToolResolver {
    pub fn new(paths: ToolSearchPaths) -> Self {
        Self { paths }
    }

    /// Every location `resolve` would try, in order.
    ///
    /// Empty when `tool_name` is not a plain file name (contains a path
    /// separator, is `.`/`..`, or is blank).
    pub fn candidates(&self, tool_name: &str) -> Vec<PathBuf> {
        let tool = tool_name.trim();
        if !is_plain_name(tool) {
            return Vec::new();
        }
        let exe = executable_name(tool);

        let mut candidates = vec![self.paths.packaged.join(&exe)];
        for root in &self.paths.fallbacks {
            candidates.push(root.join(&exe));
            candidates.push(root.join(tool).join(&exe));
        }
        candidates
    }

    /// First existing executable for `tool_name`, as an absolute path.
    pub fn resolve(&self, tool_name: &str) -> Option<PathBuf> {
        for candidate in self.candidates(tool_name) {
            if is_executable(&candidate) {
                debug!(tool = tool_name, path = %candidate.display(), "Resolved tool");
                return Some(dunce::canonicalize(&candidate).unwrap_or(candidate));
            }
            debug!(tool = tool_name, path = %candidate.display(), "Tool candidate missing");
        }
        None
    }
}

/// File name of a tool's executable on this platform.
///
/// Appends the platform suffix (`.exe` on Windows, nothing elsewhere)
/// unless the name already ends with it.
pub fn executable_name(tool_name: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || tool_name.to_lowercase().ends_with(suffix) {
        tool_name.to_string()
    } else {
        format!("{}{}", tool_name, suffix)
    }
}

fn is_plain_name(tool: &str) -> bool {
    !tool.is_empty() && tool != "." && tool != ".." && !tool.contains(['/', '\\'])
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_aliases_are_case_insensitive() {
        let aliases = ToolAliases::default();
        assert_eq!(aliases.tool_for("Terminal"), "OOS.Terminal");
        assert_eq!(aliases.tool_for("VPN"), "OOS.VPN");
        assert_eq!(aliases.tool_for("Decoder"), "Decoder");
    }

    #[test]
    fn inserted_alias_replaces_stock_one() {
        let mut aliases = ToolAliases::default();
        aliases.insert("Email", "Mailer");
        assert_eq!(aliases.get("email"), Some("Mailer"));
        assert_eq!(aliases.iter().count(), 3);
    }

    #[test]
    fn base_dir_fallbacks_skip_packaged_dir() {
        let paths = ToolSearchPaths::for_base_dir(Path::new("/app/target/debug"));
        assert_eq!(paths.packaged, PathBuf::from("/app/target/debug"));
        assert_eq!(
            paths.fallbacks,
            vec![
                PathBuf::from("/app/target"),
                PathBuf::from("/app/target/release"),
            ]
        );
    }

    #[test]
    fn path_like_tool_names_have_no_candidates() {
        let resolver = ToolResolver::new(ToolSearchPaths::new("/app"));
        assert!(resolver.candidates("../evil").is_empty());
        assert!(resolver.candidates("bin/tool").is_empty());
        assert!(resolver.candidates("  ").is_empty());
    }

    #[test]
    fn executable_name_is_idempotent() {
        let once = executable_name("OOS.Terminal");
        assert_eq!(executable_name(&once), once);
    }
}
