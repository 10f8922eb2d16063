//! Manifest document loading
//!
//! Accepted shapes, in any format [`sandbox_fs::Format`] understands:
//!
//! ```text
//! [ { "kind": "directory", "path": "Notes" }, ... ]
//!
//! { "version": 1, "items": [ { "Kind": "file", "Path": "README.txt" }, ... ] }
//! ```
//!
//! Keys match case-insensitively and unknown keys are ignored. `entries` is
//! accepted as an alias for `items`.

use std::io::ErrorKind;
use std::path::Path;

use sandbox_fs::{ConfigStore, Format, NormalizedPath};
use serde_json::{Map, Value};
use tracing::debug;

use crate::entry::{EntryKind, ManifestEntry};
use crate::error::{ManifestError, Result};

/// The only manifest schema version this crate understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Manifests larger than this are rejected without parsing.
pub const MAX_MANIFEST_BYTES: u64 = 1024 * 1024;

/// The ordered list of entries the sandbox is expected to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    entries: Vec<ManifestEntry>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries,
        }
    }

    /// Load a manifest from disk.
    ///
    /// The format is chosen from the extension; anything that is not
    /// `.toml`, `.yaml` or `.yml` is read as JSON.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::NotFound`] when nothing exists at `path`
    /// - [`ManifestError::TooLarge`] above [`MAX_MANIFEST_BYTES`]
    /// - [`ManifestError::Unreadable`] when the file exists but cannot be read
    /// - [`ManifestError::Parse`] when the content does not match the schema
    pub fn load(path: &Path) -> Result<Self> {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ManifestError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ManifestError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if metadata.len() > MAX_MANIFEST_BYTES {
            return Err(ManifestError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: MAX_MANIFEST_BYTES,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::InvalidData {
                ManifestError::Parse {
                    path: path.to_path_buf(),
                    message: "content is not valid UTF-8".to_string(),
                }
            } else {
                ManifestError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let normalized = NormalizedPath::new(path);
        let format = Format::from_path(&normalized).unwrap_or(Format::Json);
        let manifest = Self::parse_at(&content, format, &normalized)?;

        debug!(
            path = %normalized,
            format = format.name(),
            entries = manifest.entries.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse a manifest from in-memory content.
    ///
    /// # Example
    ///
    /// ```
    /// use sandbox_fs::Format;
    /// use sandbox_manifest::{EntryKind, Manifest};
    ///
    /// let manifest = Manifest::parse(
    ///     r#"[{"kind": "directory", "path": "Notes"}]"#,
    ///     Format::Json,
    /// ).unwrap();
    ///
    /// assert_eq!(manifest.entries()[0].kind, EntryKind::Directory);
    /// ```
    pub fn parse(content: &str, format: Format) -> Result<Self> {
        Self::parse_at(content, format, &NormalizedPath::new("<memory>"))
    }

    fn parse_at(content: &str, format: Format, origin: &NormalizedPath) -> Result<Self> {
        let document: Value = ConfigStore::new()
            .parse_str(content, format, origin)
            .map_err(|e| match e {
                sandbox_fs::Error::ConfigParse {
                    format, message, ..
                } => parse_error(origin, format!("invalid {}: {}", format, message)),
                other => parse_error(origin, other.to_string()),
            })?;
        Self::from_document(document, origin)
    }

    fn from_document(document: Value, origin: &NormalizedPath) -> Result<Self> {
        let (version, items) = match document {
            Value::Array(items) => (SCHEMA_VERSION, items),
            Value::Object(map) => {
                let mut map = lowercase_keys(map);
                let version = match map.remove("version") {
                    None | Some(Value::Null) => SCHEMA_VERSION,
                    Some(v) => parse_version(&v)
                        .ok_or_else(|| parse_error(origin, format!("invalid version {}", v)))?,
                };
                if version != SCHEMA_VERSION {
                    return Err(parse_error(
                        origin,
                        format!(
                            "unsupported manifest version {} (expected {})",
                            version, SCHEMA_VERSION
                        ),
                    ));
                }
                let items = match map.remove("items").or_else(|| map.remove("entries")) {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => {
                        return Err(parse_error(origin, "expected an `items` list".to_string()));
                    }
                    Some(other) => {
                        return Err(parse_error(
                            origin,
                            format!("`items` must be a list, found {}", type_name(&other)),
                        ));
                    }
                };
                (version, items)
            }
            other => {
                return Err(parse_error(
                    origin,
                    format!("expected a list of entries, found {}", type_name(&other)),
                ));
            }
        };

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_entry(index, item, origin))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { version, entries })
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(index: usize, item: Value, origin: &NormalizedPath) -> Result<ManifestEntry> {
    let map = match item {
        Value::Object(map) => lowercase_keys(map),
        other => {
            return Err(parse_error(
                origin,
                format!("entry {} is not an object (found {})", index, type_name(&other)),
            ));
        }
    };

    let path = match map.get("path") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(parse_error(
                origin,
                format!("entry {}: `path` must be a string, found {}", index, type_name(other)),
            ));
        }
        None => {
            return Err(parse_error(
                origin,
                format!("entry {} is missing required field `path`", index),
            ));
        }
    };

    let kind = EntryKind::from_value(map.get("kind").unwrap_or(&Value::Null));

    let source = optional_string(&map, "source", index, origin)?.filter(|s| !s.trim().is_empty());
    let content = optional_string(&map, "content", index, origin)?;
    let target = optional_string(&map, "target", index, origin)?.filter(|s| !s.trim().is_empty());
    let description = optional_string(&map, "description", index, origin)?
        .filter(|s| !s.trim().is_empty());

    Ok(ManifestEntry {
        kind,
        path,
        source,
        content,
        target,
        description,
    })
}

fn optional_string(
    map: &Map<String, Value>,
    key: &str,
    index: usize,
    origin: &NormalizedPath,
) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(parse_error(
            origin,
            format!(
                "entry {}: `{}` must be a string, found {}",
                index,
                key,
                type_name(other)
            ),
        )),
    }
}

fn lowercase_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect()
}

fn parse_version(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn parse_error(origin: &NormalizedPath, message: String) -> ManifestError {
    ManifestError::Parse {
        path: origin.to_native(),
        message,
    }
}
