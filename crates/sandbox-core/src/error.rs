//! Error types for sandbox-core

/// Result type for sandbox-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sandbox-core operations
///
/// These never cross [`crate::IntegrityService::validate_and_repair`]; that
/// entry point turns every failure into a [`crate::RunResult`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A well-known location could not be determined
    #[error("Could not determine the {what} location")]
    LocationUnavailable { what: String },

    /// Manifest error from sandbox-manifest
    #[error(transparent)]
    Manifest(#[from] sandbox_manifest::ManifestError),

    /// Filesystem error from sandbox-fs
    #[error(transparent)]
    Fs(#[from] sandbox_fs::Error),

    /// Tool or shortcut error from sandbox-tools
    #[error(transparent)]
    Tools(#[from] sandbox_tools::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
