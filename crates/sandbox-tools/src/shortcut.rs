//! Platform shortcut creation
//!
//! Every writer performs a full recreate: an existing file or link at the
//! destination is replaced, never edited. A directory at the destination is
//! left alone and reported as [`Error::LinkOccupied`].

use std::fs;
use std::path::Path;

use sandbox_fs::{NormalizedPath, RobustnessConfig, io};
use tracing::debug;

use crate::{Error, Result};

/// Capability to materialize a shortcut to an executable.
pub trait ShortcutWriter: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Create (or recreate) a shortcut at `link_path` launching `target_exe`
    /// from `working_dir`.
    fn create(
        &self,
        target_exe: &Path,
        link_path: &Path,
        working_dir: &Path,
        description: Option<&str>,
    ) -> Result<()>;
}

/// The writer matching the host platform's shortcut concept.
pub fn platform_writer() -> Box<dyn ShortcutWriter> {
    #[cfg(windows)]
    {
        Box::new(WshShortcutWriter)
    }
    #[cfg(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        Box::new(DesktopEntryWriter)
    }
    #[cfg(all(
        unix,
        not(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        ))
    ))]
    {
        Box::new(SymlinkWriter)
    }
    #[cfg(not(any(windows, unix)))]
    {
        Box::new(NoopShortcutWriter)
    }
}

/// Remove whatever file or link sits at `link_path` so it can be recreated.
fn clear_link(link_path: &Path) -> Result<()> {
    match fs::symlink_metadata(link_path) {
        Ok(meta) if meta.is_dir() => Err(Error::LinkOccupied {
            path: link_path.to_path_buf(),
        }),
        Ok(_) => fs::remove_file(link_path).map_err(|e| Error::io(link_path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(link_path, e)),
    }
}

fn ensure_parent(link_path: &Path) -> Result<()> {
    if let Some(parent) = link_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Writes a freedesktop `.desktop` launcher file.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopEntryWriter;

impl DesktopEntryWriter {
    /// Render the launcher file body.
    pub fn render(
        target_exe: &Path,
        link_path: &Path,
        working_dir: &Path,
        description: Option<&str>,
    ) -> String {
        let name = link_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Shortcut".to_string());

        let mut body = String::from("[Desktop Entry]\n");
        body.push_str("Type=Application\n");
        body.push_str(&format!("Name={}\n", escape_value(&name)));
        body.push_str(&format!(
            "Exec={}\n",
            escape_value(&quote_exec_arg(&target_exe.to_string_lossy()))
        ));
        body.push_str(&format!(
            "Path={}\n",
            escape_value(&working_dir.to_string_lossy())
        ));
        if let Some(description) = description {
            body.push_str(&format!("Comment={}\n", escape_value(description)));
        }
        body.push_str("Terminal=false\n");
        body
    }
}

/// Quote one `Exec=` argument: reserved characters inside the double quotes
/// get a backslash, and `%` is doubled so it is not read as a field code.
fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '"' | '`' | '$' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl ShortcutWriter for DesktopEntryWriter {
    fn name(&self) -> &'static str {
        "desktop-entry"
    }

    fn create(
        &self,
        target_exe: &Path,
        link_path: &Path,
        working_dir: &Path,
        description: Option<&str>,
    ) -> Result<()> {
        clear_link(link_path)?;
        let body = Self::render(target_exe, link_path, working_dir, description);
        io::write_atomic(
            &NormalizedPath::new(link_path),
            body.as_bytes(),
            RobustnessConfig::default(),
        )?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(link_path, fs::Permissions::from_mode(0o755))
                .map_err(|e| Error::io(link_path, e))?;
        }

        debug!(link = %link_path.display(), target = %target_exe.display(), "Wrote desktop entry");
        Ok(())
    }
}

/// Creates a symbolic link to the executable.
///
/// Symlinks carry no working directory or description; both are ignored.
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkWriter;

#[cfg(unix)]
impl ShortcutWriter for SymlinkWriter {
    fn name(&self) -> &'static str {
        "symlink"
    }

    fn create(
        &self,
        target_exe: &Path,
        link_path: &Path,
        _working_dir: &Path,
        _description: Option<&str>,
    ) -> Result<()> {
        clear_link(link_path)?;
        ensure_parent(link_path)?;
        std::os::unix::fs::symlink(target_exe, link_path).map_err(|e| Error::io(link_path, e))?;
        debug!(link = %link_path.display(), target = %target_exe.display(), "Created symlink");
        Ok(())
    }
}

/// Creates a Windows `.lnk` file through the WScript.Shell automation object.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct WshShortcutWriter;

#[cfg(windows)]
impl WshShortcutWriter {
    fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn script(
        target_exe: &Path,
        link_path: &Path,
        working_dir: &Path,
        description: Option<&str>,
    ) -> String {
        let target = target_exe.to_string_lossy();
        let mut script = format!(
            "$ErrorActionPreference = 'Stop'; \
             $s = (New-Object -ComObject WScript.Shell).CreateShortcut({link}); \
             $s.TargetPath = {target}; \
             $s.WorkingDirectory = {dir}; \
             $s.WindowStyle = 1; \
             $s.IconLocation = {target};",
            link = Self::quote(&link_path.to_string_lossy()),
            target = Self::quote(&target),
            dir = Self::quote(&working_dir.to_string_lossy()),
        );
        if let Some(description) = description {
            script.push_str(&format!(" $s.Description = {};", Self::quote(description)));
        }
        script.push_str(" $s.Save()");
        script
    }
}

#[cfg(windows)]
impl ShortcutWriter for WshShortcutWriter {
    fn name(&self) -> &'static str {
        "wsh"
    }

    fn create(
        &self,
        target_exe: &Path,
        link_path: &Path,
        working_dir: &Path,
        description: Option<&str>,
    ) -> Result<()> {
        clear_link(link_path)?;
        ensure_parent(link_path)?;

        let output = std::process::Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(Self::script(target_exe, link_path, working_dir, description))
            .output()
            .map_err(|e| Error::ShortcutFailed {
                link: link_path.to_path_buf(),
                message: format!("could not start PowerShell: {}", e),
            })?;

        if !output.status.success() || !link_path.is_file() {
            return Err(Error::ShortcutFailed {
                link: link_path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!(link = %link_path.display(), target = %target_exe.display(), "Created .lnk shortcut");
        Ok(())
    }
}

/// Writer for platforms without a shortcut concept; always refuses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopShortcutWriter;

impl ShortcutWriter for NoopShortcutWriter {
    fn name(&self) -> &'static str {
        "none"
    }

    fn create(
        &self,
        _target_exe: &Path,
        _link_path: &Path,
        _working_dir: &Path,
        _description: Option<&str>,
    ) -> Result<()> {
        Err(Error::Unsupported {
            platform: std::env::consts::OS.to_string(),
        })
    }
}
