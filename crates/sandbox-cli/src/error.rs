//! Error types for sandbox-cli

pub type Result<T> = std::result::Result<T, CliError>;

/// Anything a command can fail with; printed as `error: <message>`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] sandbox_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `--json` serialization
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Bad input from the command line
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
