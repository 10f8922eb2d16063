//! Manifest schema and loading for the sandbox integrity engine.
//!
//! A manifest declares the entries the sandbox is expected to contain.
//! Loading distinguishes a missing manifest (a normal deployment state)
//! from a broken one (an authoring defect).

pub mod entry;
pub mod error;
pub mod loader;

pub use entry::{EntryKind, ManifestEntry};
pub use error::{ManifestError, Result};
pub use loader::{MAX_MANIFEST_BYTES, Manifest, SCHEMA_VERSION};
