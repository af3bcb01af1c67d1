//! 7-Zip container adapter.
//!
//! 7z keeps entry metadata (names, directory flags, Windows attributes, NT
//! timestamps) in the archive header, separate from the compressed streams.
//! Parsing therefore takes two passes: a metadata read, then a content pass
//! that decompresses the streams and collects each entry's bytes in memory.
//!
//! Unix metadata rides in the Windows-attribute word: when bit 15 is set,
//! the high half carries the Unix mode, which is how symlinks and
//! permissions survive archives created on Unix.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use sevenz_rust2::Archive;
use sevenz_rust2::Password;

use crate::ExtractError;
use crate::Result;
use crate::entry::ArchiveEntry;
use crate::entry::EntryAttributes;
use crate::entry::EntryKind;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Bit 15 of the Windows-attribute word marks the Unix-mode extension.
const UNIX_EXTENSION: u32 = 0x8000;
const FILE_ATTRIBUTE_READONLY: u32 = 0x0001;
const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;

/// Seconds between the NT epoch (1601-01-01) and the Unix epoch.
const NT_EPOCH_OFFSET_SECS: u64 = 11_644_473_600;

/// Parses a complete 7z archive into entries, in header order.
///
/// Symbolic links are recognized from the Unix-mode extension of the
/// Windows attributes, with the target stored as entry content. Windows
/// reparse points without that extension cannot be reconstructed and
/// become [`EntryKind::Unknown`].
///
/// # Errors
///
/// Returns [`ExtractError::InvalidArchive`] when the header or the
/// compressed streams cannot be read.
pub fn open(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut cursor = Cursor::new(data);
    let password = Password::empty();
    let archive = Archive::read(&mut cursor, &password)
        .map_err(|e| ExtractError::InvalidArchive(format!("failed to open 7z archive: {e}")))?;

    cursor.rewind()?;
    let mut contents = read_contents(&mut cursor)?;

    let mut entries = Vec::with_capacity(archive.files.len());
    for raw in &archive.files {
        let path = PathBuf::from(&raw.name);
        let unix_mode = unix_mode_of(raw);

        let attributes = EntryAttributes {
            modified: modified_time(raw),
            created: creation_time(raw),
            permissions: unix_mode.map(|m| m & 0o7777),
            read_only: raw
                .has_windows_attributes
                .then(|| raw.windows_attributes & FILE_ATTRIBUTE_READONLY != 0),
        };

        let content = contents.remove(&raw.name).unwrap_or_default();

        let entry = if raw.is_directory() {
            ArchiveEntry {
                path,
                kind: EntryKind::Directory,
                data: Vec::new(),
                attributes,
            }
        } else if unix_mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let target = String::from_utf8(content)
                .map(PathBuf::from)
                .map_err(|_| ExtractError::LinkTargetMissing { path: path.clone() })?;
            ArchiveEntry {
                path,
                kind: EntryKind::Symlink { target },
                data: Vec::new(),
                attributes,
            }
        } else if is_reparse_point(raw) {
            // A reparse point without the Unix-mode extension carries no
            // usable target.
            ArchiveEntry {
                path,
                kind: EntryKind::Unknown {
                    kind: "reparse point".to_string(),
                },
                data: Vec::new(),
                attributes,
            }
        } else {
            ArchiveEntry {
                path,
                kind: EntryKind::File,
                data: content,
                attributes,
            }
        };

        entries.push(entry);
    }

    Ok(entries)
}

/// Content pass: decompresses the archive streams, collecting every
/// non-directory entry's bytes keyed by entry name. Nothing is written to
/// the filesystem; the destination argument of the callback API is unused.
fn read_contents<R: Read + Seek>(source: &mut R) -> Result<HashMap<String, Vec<u8>>> {
    let contents = RefCell::new(HashMap::new());

    let extract_fn = |entry: &sevenz_rust2::ArchiveEntry,
                      reader: &mut dyn Read,
                      _dest: &PathBuf|
     -> std::result::Result<bool, sevenz_rust2::Error> {
        if !entry.is_directory() {
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            contents.borrow_mut().insert(entry.name.clone(), data);
        }
        Ok(true)
    };

    sevenz_rust2::decompress_with_extract_fn(source, std::env::temp_dir(), extract_fn)
        .map_err(|e| ExtractError::InvalidArchive(format!("failed to read 7z content: {e}")))?;

    Ok(contents.into_inner())
}

fn unix_mode_of(entry: &sevenz_rust2::ArchiveEntry) -> Option<u32> {
    (entry.has_windows_attributes && entry.windows_attributes & UNIX_EXTENSION != 0)
        .then(|| entry.windows_attributes >> 16)
}

fn modified_time(entry: &sevenz_rust2::ArchiveEntry) -> Option<SystemTime> {
    entry
        .has_last_modified_date
        .then(|| nt_time_to_system_time(u64::from(entry.last_modified_date)))
        .flatten()
}

fn creation_time(entry: &sevenz_rust2::ArchiveEntry) -> Option<SystemTime> {
    entry
        .has_creation_date
        .then(|| nt_time_to_system_time(u64::from(entry.creation_date)))
        .flatten()
}

fn is_reparse_point(entry: &sevenz_rust2::ArchiveEntry) -> bool {
    entry.has_windows_attributes
        && entry.windows_attributes & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

/// Converts a raw NT FILETIME (100 ns units since 1601-01-01) to a
/// `SystemTime`. Timestamps before the Unix epoch are dropped.
fn nt_time_to_system_time(raw: u64) -> Option<SystemTime> {
    let secs = (raw / 10_000_000).checked_sub(NT_EPOCH_OFFSET_SECS)?;
    let nanos = u32::try_from((raw % 10_000_000) * 100).ok()?;
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}
