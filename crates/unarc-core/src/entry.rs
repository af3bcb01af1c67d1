//! Abstract archive entry model shared by all container adapters.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Kind of an archive entry.
///
/// Classification happens once, inside the container adapters. A directory
/// may be signaled by an explicit type flag or by the trailing-slash plus
/// size-zero convention; both are normalized into `Directory` here and the
/// materializer never re-inspects the raw container metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory entry.
    Directory,

    /// Regular file entry.
    File,

    /// Symbolic link entry.
    ///
    /// `target` is relative to the directory containing the link, exactly
    /// as stored in the container.
    Symlink {
        /// The link target path.
        target: PathBuf,
    },

    /// Entry type this tool does not materialize (hardlinks, devices,
    /// FIFOs). Carried through so the materializer can warn and skip.
    Unknown {
        /// Human-readable description of the container's type flag.
        kind: String,
    },
}

impl EntryKind {
    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a symbolic link.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }
}

/// Optional filesystem metadata carried by an entry.
///
/// Each field may be absent; presence depends on the source format (TAR has
/// no creation time, 7z rarely stores Unix permissions). Absent fields are
/// left at filesystem defaults during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryAttributes {
    /// Modification time.
    pub modified: Option<SystemTime>,

    /// Creation time.
    pub created: Option<SystemTime>,

    /// Unix permission bits (the low 12 bits of the mode).
    pub permissions: Option<u32>,

    /// Read-only flag.
    pub read_only: Option<bool>,
}

impl EntryAttributes {
    /// Returns `true` when no attribute is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.modified.is_none()
            && self.created.is_none()
            && self.permissions.is_none()
            && self.read_only.is_none()
    }

    /// Renders the attribute log suffix printed after an entry line,
    /// e.g. `" attributes: mtime: 1500000000 permissions: 644"`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut log = String::from(" attributes:");
        if let Some(mtime) = self.modified {
            let _ = write!(log, " mtime: {}", unix_seconds(mtime));
        }
        if let Some(ctime) = self.created {
            let _ = write!(log, " ctime: {}", unix_seconds(ctime));
        }
        if self.read_only == Some(true) {
            log.push_str(" read-only");
        }
        if let Some(permissions) = self.permissions {
            let _ = write!(log, " permissions: {permissions:o}");
        }
        log
    }
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

/// One logical item of a parsed container.
///
/// Paths are relative and slash-separated; content is resident in memory,
/// matching the whole-archive-in-memory model of the container adapters.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Relative path of the entry inside the archive.
    pub path: PathBuf,

    /// Classified entry kind.
    pub kind: EntryKind,

    /// Entry content. Empty for directories and for symlinks whose target
    /// came from a header side channel.
    pub data: Vec<u8>,

    /// Optional metadata to restore on the materialized entry.
    pub attributes: EntryAttributes,
}

impl ArchiveEntry {
    /// Creates a directory entry without attributes.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            data: Vec::new(),
            attributes: EntryAttributes::default(),
        }
    }

    /// Creates a regular file entry without attributes.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            data: data.into(),
            attributes: EntryAttributes::default(),
        }
    }

    /// Creates a symbolic link entry.
    #[must_use]
    pub fn symlink(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Symlink {
                target: target.into(),
            },
            data: Vec::new(),
            attributes: EntryAttributes::default(),
        }
    }

    /// Replaces the entry's attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: EntryAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}
