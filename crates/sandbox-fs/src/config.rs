//! Format-agnostic document loading

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Structured document formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect the format of a path from its extension.
    pub fn from_path(path: &NormalizedPath) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic document store.
///
/// Detects the format from the file extension and handles
/// deserialization transparently.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
            extension: path.extension().unwrap_or("").to_string(),
        })?;
        self.load_as(path, format)
    }

    /// Load a document from a file using an explicit format.
    pub fn load_as<T: DeserializeOwned>(&self, path: &NormalizedPath, format: Format) -> Result<T> {
        let content = io::read_text(path)?;
        self.parse_str(&content, format, path)
    }

    /// Parse in-memory content; `origin` is only used for error messages.
    pub fn parse_str<T: DeserializeOwned>(
        &self,
        content: &str,
        format: Format,
        origin: &NormalizedPath,
    ) -> Result<T> {
        let parsed = match format {
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: origin.to_native(),
            format: format.name().into(),
            message,
        })
    }
}
