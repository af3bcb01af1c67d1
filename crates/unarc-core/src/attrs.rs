//! Filesystem attribute application.

use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::ExtractError;
use crate::Result;
use crate::entry::EntryAttributes;

/// Attribute keys the current platform can restore.
///
/// Keys that are `false` here are skipped silently during application;
/// only failures on supported keys surface as errors.
#[derive(Debug, Clone, Copy)]
pub struct PlatformCaps {
    /// Modification time can be set.
    pub modified: bool,
    /// Creation time can be set.
    pub created: bool,
    /// Unix permission bits can be set.
    pub permissions: bool,
    /// Read-only flag can be set.
    pub read_only: bool,
}

impl PlatformCaps {
    /// Capabilities of the platform this binary was compiled for.
    ///
    /// Creation time is not settable through stable std APIs anywhere, so
    /// `created` is always `false`. Permission bits only exist on Unix.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            modified: true,
            created: false,
            permissions: cfg!(unix),
            read_only: true,
        }
    }
}

/// Applies an entry's attributes to an already-materialized path.
///
/// Unsupported-on-platform keys are skipped without error. The modification
/// time is written last so earlier permission writes cannot clobber it, and
/// only when `restore_mtimes` is set.
///
/// # Errors
///
/// Returns [`ExtractError::AttributeWrite`] when a platform-supported key
/// fails to apply.
pub fn apply_attributes(
    path: &Path,
    attributes: &EntryAttributes,
    restore_mtimes: bool,
) -> Result<()> {
    let caps = PlatformCaps::current();

    #[cfg(unix)]
    if caps.permissions {
        if let Some(mode) = attributes.permissions {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
                .map_err(|source| attribute_error(path, source))?;
        }
    }

    if caps.read_only && attributes.read_only == Some(true) {
        let mut permissions = fs::metadata(path)
            .map_err(|source| attribute_error(path, source))?
            .permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions).map_err(|source| attribute_error(path, source))?;
    }

    if caps.modified && restore_mtimes {
        if let Some(modified) = attributes.modified {
            filetime::set_file_mtime(path, FileTime::from_system_time(modified))
                .map_err(|source| attribute_error(path, source))?;
        }
    }

    Ok(())
}

fn attribute_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::AttributeWrite {
        path: path.to_path_buf(),
        source,
    }
}
