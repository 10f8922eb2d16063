//! Error types for sandbox-manifest

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No manifest at the given path; callers treat this as "nothing declared".
    #[error("Manifest not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Manifest at {path} could not be parsed: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Manifest too large: {path} is {size} bytes (max {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Manifest at {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// True only for the "no manifest declared" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The failure without the manifest path, for reports that already show it.
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound { .. } => "file not found".to_string(),
            Self::Parse { message, .. } => message.clone(),
            Self::TooLarge { size, max, .. } => format!("file is {} bytes (max {})", size, max),
            Self::Unreadable { source, .. } => source.to_string(),
        }
    }
}
