//! TAR container adapter.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use crate::ExtractError;
use crate::Result;
use crate::entry::ArchiveEntry;
use crate::entry::EntryAttributes;
use crate::entry::EntryKind;

/// Parses a complete TAR archive into entries, in archive order.
///
/// Directories are recognized from the header type flag and, for archives
/// written by tools that only use the convention, from a trailing slash on
/// a size-zero regular entry. Hardlinks and special files (devices, FIFOs)
/// become [`EntryKind::Unknown`] so the materializer can skip them with a
/// warning instead of failing the run.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidArchive`] when the archive headers cannot
/// be parsed.
pub fn open(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = tar::Archive::new(data);
    let mut entries = Vec::new();

    let raw_entries = archive
        .entries()
        .map_err(|e| ExtractError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    for raw in raw_entries {
        let mut raw = raw
            .map_err(|e| ExtractError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;

        let path = raw
            .path()
            .map_err(|e| ExtractError::InvalidArchive(format!("invalid TAR entry path: {e}")))?
            .into_owned();
        let trailing_slash = raw.path_bytes().ends_with(b"/");

        let attributes = EntryAttributes {
            modified: raw
                .header()
                .mtime()
                .ok()
                .and_then(|t| SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(t))),
            created: None,
            permissions: raw.header().mode().ok().map(|m| m & 0o7777),
            read_only: None,
        };

        let kind = match raw.header().entry_type() {
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Symlink => {
                let target = raw
                    .link_name()
                    .map_err(|e| {
                        ExtractError::InvalidArchive(format!("invalid TAR link target: {e}"))
                    })?
                    .map_or_else(PathBuf::new, std::borrow::Cow::into_owned);
                EntryKind::Symlink { target }
            }
            tar::EntryType::Link => EntryKind::Unknown {
                kind: "hardlink".to_string(),
            },
            tar::EntryType::Char => EntryKind::Unknown {
                kind: "character device".to_string(),
            },
            tar::EntryType::Block => EntryKind::Unknown {
                kind: "block device".to_string(),
            },
            tar::EntryType::Fifo => EntryKind::Unknown {
                kind: "fifo".to_string(),
            },
            // Regular, Continuous, and the GNU/PAX extensions the tar crate
            // does not consume internally.
            _ => {
                if trailing_slash && raw.size() == 0 {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                }
            }
        };

        let data = if kind.is_file() {
            let mut content = Vec::with_capacity(usize::try_from(raw.size()).unwrap_or(0));
            raw.read_to_end(&mut content).map_err(|e| {
                ExtractError::InvalidArchive(format!(
                    "failed to read TAR entry content for {}: {e}",
                    path.display()
                ))
            })?;
            content
        } else {
            Vec::new()
        };

        entries.push(ArchiveEntry {
            path,
            kind,
            data,
            attributes,
        });
    }

    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;

    #[test]
    fn test_open_files_and_dirs() {
        let data = TarTestBuilder::new()
            .add_directory("dir/")
            .add_file("dir/file.txt", b"content")
            .build();

        let entries = open(&data).expect("valid archive");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].kind.is_directory());
        assert_eq!(entries[0].path, PathBuf::from("dir"));
        assert!(entries[1].kind.is_file());
        assert_eq!(entries[1].data, b"content");
    }

    #[test]
    fn test_open_symlink() {
        let data = TarTestBuilder::new()
            .add_file("file.txt", b"x")
            .add_symlink("link", "file.txt")
            .build();

        let entries = open(&data).expect("valid archive");
        assert_eq!(
            entries[1].kind,
            EntryKind::Symlink {
                target: PathBuf::from("file.txt")
            }
        );
        assert!(entries[1].data.is_empty());
    }

    #[test]
    fn test_open_hardlink_unknown() {
        let data = TarTestBuilder::new()
            .add_file("file.txt", b"x")
            .add_hardlink("hard", "file.txt")
            .build();

        let entries = open(&data).expect("valid archive");
        assert_eq!(
            entries[1].kind,
            EntryKind::Unknown {
                kind: "hardlink".to_string()
            }
        );
    }

    #[test]
    fn test_attributes_from_header() {
        let data = TarTestBuilder::new()
            .add_file_with_mtime("stamped.txt", b"x", 1_400_000_000)
            .build();

        let entries = open(&data).expect("valid archive");
        let attrs = &entries[0].attributes;
        assert_eq!(
            attrs.modified,
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_400_000_000))
        );
        assert_eq!(attrs.permissions, Some(0o644));
        assert!(attrs.created.is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        // A full block of 0xFF fails the header checksum.
        let garbage = vec![0xFF_u8; 1024];
        let result = open(&garbage);
        assert!(matches!(result, Err(ExtractError::InvalidArchive(_))));
    }

    #[test]
    fn test_empty_archive() {
        let data = TarTestBuilder::new().build();
        let entries = open(&data).expect("empty archive is valid");
        assert!(entries.is_empty());
    }
}
