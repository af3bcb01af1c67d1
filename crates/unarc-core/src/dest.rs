//! Validated destination directory type.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractError;
use crate::Result;

/// A validated destination directory for archive extraction.
///
/// A `DestDir` is guaranteed to exist, to be a directory, and to be held as
/// an absolute canonical path. It can only be constructed through
/// [`DestDir::ensure`], which runs before any archive entry is processed.
///
/// # Examples
///
/// ```no_run
/// use unarc_core::DestDir;
///
/// # fn main() -> Result<(), unarc_core::ExtractError> {
/// let dest = DestDir::ensure("/tmp/out", true)?;
/// println!("extracting to {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates the destination path, optionally creating it.
    ///
    /// - Existing directory: succeeds with no side effect.
    /// - Existing non-directory: fails with [`ExtractError::NotADirectory`].
    /// - Missing and `create_if_missing`: creates the directory and all
    ///   missing ancestors.
    /// - Missing otherwise: fails with [`ExtractError::DestinationMissing`].
    ///
    /// # Errors
    ///
    /// Returns an error for a non-directory target, a missing target when
    /// creation was not requested, or any filesystem failure while creating
    /// or canonicalizing the path.
    pub fn ensure(path: impl Into<PathBuf>, create_if_missing: bool) -> Result<Self> {
        let path = path.into();

        if path.exists() {
            if !path.is_dir() {
                return Err(ExtractError::NotADirectory { path });
            }
        } else if create_if_missing {
            std::fs::create_dir_all(&path)?;
        } else {
            return Err(ExtractError::DestinationMissing { path });
        }

        let canonical = path.canonicalize().map_err(|e| {
            ExtractError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the canonical destination path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
