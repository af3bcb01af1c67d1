//! ZIP container adapter.

use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;

use crate::ExtractError;
use crate::Result;
use crate::entry::ArchiveEntry;
use crate::entry::EntryAttributes;
use crate::entry::EntryKind;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Parses a complete ZIP archive into entries, in central-directory order.
///
/// Symbolic links are recognized from the Unix file type bits in the
/// external attributes; the link target is the entry's content. Timestamps
/// come from the MS-DOS date/time pair, which has no timezone, so they are
/// interpreted as UTC.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidArchive`] when the archive cannot be
/// parsed.
pub fn open(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut raw = archive.by_index(i).map_err(|e| {
            ExtractError::InvalidArchive(format!("failed to read ZIP entry {i}: {e}"))
        })?;

        let path = PathBuf::from(raw.name());
        let unix_mode = raw.unix_mode();

        let attributes = EntryAttributes {
            modified: raw.last_modified().and_then(dos_datetime_to_system_time),
            created: None,
            permissions: unix_mode.map(|m| m & 0o7777),
            read_only: None,
        };

        let entry = if raw.is_dir() {
            ArchiveEntry {
                path,
                kind: EntryKind::Directory,
                data: Vec::new(),
                attributes,
            }
        } else {
            let mut content = Vec::with_capacity(usize::try_from(raw.size()).unwrap_or(0));
            raw.read_to_end(&mut content).map_err(|e| {
                ExtractError::InvalidArchive(format!(
                    "failed to read ZIP entry content for {}: {e}",
                    path.display()
                ))
            })?;

            if unix_mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
                let target = symlink_target(&path, content)?;
                ArchiveEntry {
                    path,
                    kind: EntryKind::Symlink { target },
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
            }
        };

        entries.push(entry);
    }

    Ok(entries)
}

/// Decodes a symlink target from entry content. A target that is not valid
/// UTF-8 has no usable link destination and fails the entry.
fn symlink_target(path: &Path, content: Vec<u8>) -> Result<PathBuf> {
    String::from_utf8(content)
        .map(PathBuf::from)
        .map_err(|_| ExtractError::LinkTargetMissing {
            path: path.to_path_buf(),
        })
}

/// Converts a ZIP MS-DOS timestamp to a `SystemTime`, treating it as UTC.
fn dos_datetime_to_system_time(dt: zip::DateTime) -> Option<SystemTime> {
    let secs = civil_to_unix_seconds(
        i64::from(dt.year()),
        i64::from(dt.month()),
        i64::from(dt.day()),
    )? + i64::from(dt.hour()) * 3600
        + i64::from(dt.minute()) * 60
        + i64::from(dt.second());
    SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(u64::try_from(secs).ok()?))
}

/// Days-from-civil conversion; DOS dates start at 1980 so the result is
/// always after the Unix epoch.
fn civil_to_unix_seconds(year: i64, month: i64, day: i64) -> Option<i64> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    let days = era * 146_097 + doe - 719_468;
    Some(days * 86_400)
}
