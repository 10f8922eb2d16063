//! Error types for sandbox-tools

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] sandbox_fs::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shortcuts are not supported on {platform}")]
    Unsupported { platform: String },

    #[error("Cannot replace {path}: a directory occupies the shortcut location")]
    LinkOccupied { path: PathBuf },

    #[error("Shortcut creation failed for {link}: {message}")]
    ShortcutFailed { link: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
