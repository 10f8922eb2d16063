//! Declared sandbox entries

use std::fmt;

use serde_json::Value;

/// What kind of artifact an entry declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
    /// A link artifact pointing at a companion tool executable
    Shortcut,
    /// A tag outside the known set, kept verbatim so it can be reported
    Unknown(String),
}

impl EntryKind {
    /// Interpret a raw `kind` value from a manifest document.
    ///
    /// Strings match case-insensitively. Integers follow the legacy closed
    /// enumeration (`0` file, `1` directory, `2` shortcut).
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from_tag(s),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Self::File,
                Some(1) => Self::Directory,
                Some(2) => Self::Shortcut,
                _ => Self::Unknown(n.to_string()),
            },
            Value::Null => Self::Unknown(String::new()),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Interpret a string tag case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "directory" => Self::Directory,
            "file" => Self::File,
            "shortcut" => Self::Shortcut,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::File => write!(f, "file"),
            Self::Shortcut => write!(f, "shortcut"),
            Self::Unknown(raw) if raw.is_empty() => write!(f, "<missing kind>"),
            Self::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// One declared expectation about the sandbox.
///
/// `path` is kept exactly as declared; validation against the sandbox root
/// happens during reconciliation so a bad path surfaces as a warning rather
/// than failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: EntryKind,
    /// Path relative to the sandbox root, forward-slash separated
    pub path: String,
    /// Asset to copy from, relative to the asset root (`file` only)
    pub source: Option<String>,
    /// Literal default content (`file` only)
    pub content: Option<String>,
    /// Logical tool name the shortcut launches (`shortcut` only)
    pub target: Option<String>,
    /// Human-readable shortcut description (`shortcut` only)
    pub description: Option<String>,
}

impl ManifestEntry {
    pub fn new(kind: EntryKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            source: None,
            content: None,
            target: None,
            description: None,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(EntryKind::Directory, path)
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(EntryKind::File, path)
    }

    pub fn shortcut(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(EntryKind::Shortcut, path).with_target(target)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
