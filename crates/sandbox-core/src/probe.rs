//! Read-only inspection of one sandbox path

use std::fs;

use sandbox_fs::NormalizedPath;
use sandbox_manifest::EntryKind;
use tracing::debug;

/// What currently occupies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Absent,
    Directory,
    File,
    /// Exists but is neither a regular file nor a directory
    Other,
}

/// Inspects candidate paths under the sandbox root.
///
/// Symlinks are followed, so a link to an existing file counts as a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkspaceProbe;

impl WorkspaceProbe {
    pub fn probe(path: &NormalizedPath) -> ProbeState {
        match fs::metadata(path.to_native()) {
            Ok(meta) if meta.is_dir() => ProbeState::Directory,
            Ok(meta) if meta.is_file() => ProbeState::File,
            Ok(_) => ProbeState::Other,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %path, error = %e, "Probe failed; treating as absent");
                }
                ProbeState::Absent
            }
        }
    }

    /// Whether `state` satisfies an entry of `kind`.
    ///
    /// Shortcuts are file artifacts at this layer; their target is not checked.
    pub fn satisfies(kind: &EntryKind, state: ProbeState) -> bool {
        match kind {
            EntryKind::Directory => state == ProbeState::Directory,
            EntryKind::File | EntryKind::Shortcut => state == ProbeState::File,
            EntryKind::Unknown(_) => false,
        }
    }
}
