//! Filesystem abstraction for the sandbox integrity engine
//!
//! Provides forward-slash path normalization, relative-path validation,
//! atomic locked writes, and format-agnostic document loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format};
pub use constants::SandboxPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, validate_relative_path};
