//! Well-known names inside the application and sandbox directories.

use std::path::Path;

/// Fixed directory and file names used by the integrity engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxPath {
    /// The read-only asset tree beside the executable
    AssetsDir,
    /// The primary report directory beside the executable
    ReportDir,
    /// The manifest document inside the asset tree
    ManifestFile,
    /// The report written into the sandbox root when the primary location fails
    FallbackReport,
    /// The sandbox folder created on the user's desktop
    DefaultSandboxDir,
}

impl SandboxPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetsDir => "Assets",
            Self::ReportDir => "FileValidation",
            Self::ManifestFile => "manifest.json",
            Self::FallbackReport => "_integrity_report.txt",
            Self::DefaultSandboxDir => "Office Work Stuff",
        }
    }
}

impl AsRef<Path> for SandboxPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SandboxPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SandboxPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
