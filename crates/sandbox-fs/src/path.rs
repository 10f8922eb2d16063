//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A forward-slash path with dot segments resolved and repeated separators
/// collapsed. Converted back to a native `PathBuf` only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// `..` segments in `segment` are resolved against this path, so the
    /// result may land outside of it. Use [`validate_relative_path`] first
    /// when the segment comes from untrusted input.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if self.inner.is_empty() {
            return Self {
                inner: clean(&segment_normalized),
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Last segment, ignoring a trailing slash.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_name().map(|name| match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        })
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// True for a regular file, following symlinks.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Extension of the last segment; dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check whether this path lies inside (or equals) `root`.
    pub fn starts_with(&self, root: &NormalizedPath) -> bool {
        if root.inner.is_empty() {
            return true;
        }
        let base = root.inner.trim_end_matches('/');
        self.inner == base
            || self
                .inner
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/') || base.is_empty())
    }
}

/// Resolve dot segments and collapse repeated separators.
///
/// Leading `//` is kept for network paths. A leading `..` on a relative
/// path is dropped, and a `..` never pops a drive anchor such as `C:`.
fn clean(path: &str) -> String {
    let is_network = path.starts_with("//") && !path.starts_with("///");
    let is_absolute = path.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let anchored = parts.len() == 1 && parts[0].ends_with(':');
                if !anchored {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if is_network {
        format!("//{}", body)
    } else if is_absolute {
        format!("/{}", body)
    } else {
        body
    }
}

/// Validate a workspace-relative path declared by untrusted input.
///
/// Returns the normalized relative form (forward slashes, no dot segments)
/// or a human-readable reason the path is unacceptable: empty, absolute,
/// or escaping the root through `..`.
pub fn validate_relative_path(raw: &str) -> Result<String, String> {
    let unified = raw.trim().replace('\\', "/");
    if unified.is_empty() {
        return Err("path is empty".to_string());
    }
    if unified.starts_with('/') {
        return Err(format!("path '{}' is absolute", raw));
    }
    let bytes = unified.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return Err(format!("path '{}' is absolute", raw));
    }

    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(format!("path '{}' escapes the workspace root", raw));
                }
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Err(format!("path '{}' names the workspace root itself", raw));
    }
    Ok(parts.join("/"))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
