//! Companion tool integration for the sandbox integrity engine.
//!
//! - [`ToolResolver`] locates a companion executable by logical name
//!   across the packaged location and development fallbacks.
//! - [`ShortcutWriter`] materializes a link to that executable using
//!   whatever shortcut concept the host platform has.

pub mod error;
pub mod resolver;
pub mod shortcut;

pub use error::{Error, Result};
pub use resolver::{ToolAliases, ToolResolver, ToolSearchPaths, executable_name};
pub use shortcut::{
    DesktopEntryWriter, NoopShortcutWriter, ShortcutWriter, platform_writer,
};

#[cfg(unix)]
pub use shortcut::SymlinkWriter;
#[cfg(windows)]
pub use shortcut::WshShortcutWriter;
