//! Entry materialization: ordered archive entries to a filesystem tree.

use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractError;
use crate::Result;
use crate::attrs::apply_attributes;
use crate::config::ExtractOptions;
use crate::dest::DestDir;
use crate::entry::ArchiveEntry;
use crate::entry::EntryAttributes;
use crate::entry::EntryKind;

/// Legend printed before verbose entry lines and listings.
pub const LEGEND: &str = "d = directory, f = file, l = symbolic link";

/// Per-entry reporting seam between the materializer and its caller.
pub trait ProgressSink {
    /// Receives one entry line (`d:`/`f:`/`l:` plus attribute suffix).
    /// Only called when verbose output is enabled.
    fn entry_line(&mut self, line: &str);

    /// Receives a warning for a skipped entry. Always called, regardless
    /// of verbosity.
    fn warning(&mut self, message: &str);
}

/// Sink that discards all progress output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn entry_line(&mut self, _line: &str) {}
    fn warning(&mut self, _message: &str) {}
}

/// Counters for one materialization run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Regular files written.
    pub files: u64,
    /// Directories created or confirmed.
    pub directories: u64,
    /// Symbolic links created.
    pub symlinks: u64,
    /// Entries of unknown kind skipped with a warning.
    pub skipped: u64,
    /// Total file content bytes written.
    pub bytes_written: u64,
}

/// A directory whose attribute write is deferred until every descendant
/// entry has been materialized.
struct PendingDirAttributes {
    path: PathBuf,
    attributes: EntryAttributes,
    log: String,
}

/// Resolves an entry path against the destination root.
///
/// Only plain name components survive: `.` components are dropped, and an
/// absolute path, a path prefix, or any `..` component rejects the entry.
/// The check is purely lexical, so it holds before anything exists on disk.
///
/// # Errors
///
/// Returns [`ExtractError::PathEscape`] for any entry path that would
/// resolve outside the destination root.
pub fn resolve_entry_path(dest: &DestDir, entry_path: &Path) -> Result<PathBuf> {
    let (resolved, saw_component) = resolve_components(dest, entry_path)?;
    if !saw_component {
        return Err(ExtractError::PathEscape {
            path: entry_path.to_path_buf(),
        });
    }
    Ok(resolved)
}

/// Like [`resolve_entry_path`], but a path that reduces to no components
/// names the destination root itself. Archives written with `tar -cf out.tar
/// ./` open with a `./` directory member, which is the root, not an escape.
/// Only directory entries get this treatment.
fn resolve_dir_entry_path(dest: &DestDir, entry_path: &Path) -> Result<PathBuf> {
    let (resolved, _) = resolve_components(dest, entry_path)?;
    Ok(resolved)
}

fn resolve_components(dest: &DestDir, entry_path: &Path) -> Result<(PathBuf, bool)> {
    let mut resolved = dest.as_path().to_path_buf();
    let mut saw_component = false;

    for component in entry_path.components() {
        match component {
            Component::Normal(name) => {
                resolved.push(name);
                saw_component = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::PathEscape {
                    path: entry_path.to_path_buf(),
                });
            }
        }
    }

    Ok((resolved, saw_component))
}

/// Materializes an ordered sequence of entries under a validated
/// destination.
///
/// Directories are created idempotently and their attribute writes are
/// queued; the queue is drained only after the entry loop, so a parent's
/// restored mtime is never clobbered by a later child write. Symbolic links
/// never receive attribute writes. Entries of unknown kind are skipped with
/// a warning and do not fail the run.
///
/// # Errors
///
/// Fails on path escapes, content write failures, missing link targets,
/// and attribute write failures on platform-supported keys.
pub fn materialize(
    entries: &[ArchiveEntry],
    dest: &DestDir,
    options: &ExtractOptions,
    sink: &mut dyn ProgressSink,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut pending_dirs: Vec<PendingDirAttributes> = Vec::new();

    if options.verbose {
        sink.entry_line(LEGEND);
    }

    for entry in entries {
        match &entry.kind {
            EntryKind::Directory => {
                let path = resolve_dir_entry_path(dest, &entry.path)?;
                fs::create_dir_all(&path)?;
                if !entry.attributes.is_empty() {
                    pending_dirs.push(PendingDirAttributes {
                        path,
                        attributes: entry.attributes.clone(),
                        log: format!("set for dir: {}", entry.path.display()),
                    });
                }
                summary.directories += 1;
                if options.verbose {
                    sink.entry_line(&entry_line(entry));
                }
            }
            EntryKind::File => {
                let path = resolve_entry_path(dest, &entry.path)?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, &entry.data).map_err(|source| ExtractError::ContentWrite {
                    path: entry.path.clone(),
                    source,
                })?;
                apply_attributes(&path, &entry.attributes, options.restore_mtimes)?;
                summary.files += 1;
                summary.bytes_written += entry.data.len() as u64;
                if options.verbose {
                    sink.entry_line(&entry_line(entry));
                }
            }
            EntryKind::Symlink { target } => {
                let path = resolve_entry_path(dest, &entry.path)?;
                if target.as_os_str().is_empty() {
                    return Err(ExtractError::LinkTargetMissing {
                        path: entry.path.clone(),
                    });
                }
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                create_symlink(target, &path).map_err(|source| ExtractError::ContentWrite {
                    path: entry.path.clone(),
                    source,
                })?;
                summary.symlinks += 1;
                if options.verbose {
                    sink.entry_line(&entry_line(entry));
                }
            }
            EntryKind::Unknown { kind } => {
                summary.skipped += 1;
                sink.warning(&format!(
                    "skipping unsupported entry type ({kind}): {}",
                    entry.path.display()
                ));
            }
        }
    }

    for pending in pending_dirs {
        apply_attributes(&pending.path, &pending.attributes, options.restore_mtimes)?;
        if options.verbose {
            sink.entry_line(&pending.log);
        }
    }

    Ok(summary)
}

/// Renders the listing for `-i/--info`: the legend followed by one line per
/// entry, with the same classification and attribute suffixes as verbose
/// extraction. Touches nothing on disk.
#[must_use]
pub fn render_listing(entries: &[ArchiveEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(LEGEND.to_string());
    for entry in entries {
        lines.push(entry_line(entry));
    }
    lines
}

fn entry_line(entry: &ArchiveEntry) -> String {
    let mut line = match &entry.kind {
        EntryKind::Directory => format!("d: {}", entry.path.display()),
        EntryKind::File => format!("f: {}", entry.path.display()),
        EntryKind::Symlink { target } => {
            format!("l: {} -> {}", entry.path.display(), target.display())
        }
        EntryKind::Unknown { kind } => format!("?: {} ({kind})", entry.path.display()),
    };
    if !entry.attributes.is_empty() {
        line.push_str(&entry.attributes.describe());
    }
    line
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    /// Sink that records everything it receives.
    #[derive(Debug, Default)]
    struct RecordingSink {
        lines: Vec<String>,
        warnings: Vec<String>,
    }

    impl ProgressSink for RecordingSink {
        fn entry_line(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }

        fn warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }
    }

    fn dest_in(temp: &TempDir) -> DestDir {
        DestDir::ensure(temp.path(), false).expect("temp dir should validate")
    }

    #[test]
    fn test_resolve_plain_path() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let resolved = resolve_entry_path(&dest, Path::new("a/b/c.txt")).unwrap();
        assert_eq!(resolved, dest.as_path().join("a").join("b").join("c.txt"));
    }

    #[test]
    fn test_resolve_rejects_parent_component() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let result = resolve_entry_path(&dest, Path::new("a/../../etc/passwd"));
        assert!(matches!(result, Err(ExtractError::PathEscape { .. })));
    }

    #[test]
    fn test_resolve_rejects_absolute_path() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let result = resolve_entry_path(&dest, Path::new("/etc/passwd"));
        assert!(matches!(result, Err(ExtractError::PathEscape { .. })));
    }

    #[test]
    fn test_resolve_rejects_empty_path() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        assert!(resolve_entry_path(&dest, Path::new("")).is_err());
        assert!(resolve_entry_path(&dest, Path::new(".")).is_err());
    }

    #[test]
    fn test_dot_rooted_directory_names_the_destination() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![
            ArchiveEntry::directory("./"),
            ArchiveEntry::file("./a.txt", b"a".to_vec()),
        ];

        let summary = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        )
        .expect("dot-rooted entries should extract");

        assert_eq!(summary.directories, 1);
        assert_eq!(summary.files, 1);
        assert!(temp.path().join("a.txt").is_file());
    }

    #[test]
    fn test_dot_rooted_file_still_rejected() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![ArchiveEntry::file("./", Vec::new())];

        let result = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        );
        assert!(matches!(result, Err(ExtractError::PathEscape { .. })));
    }

    #[test]
    fn test_materialize_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![ArchiveEntry::file("deep/nested/file.txt", b"hello".to_vec())];

        let summary = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        )
        .expect("materialize should succeed");

        assert_eq!(summary.files, 1);
        assert_eq!(summary.bytes_written, 5);
        let written = fs::read(temp.path().join("deep/nested/file.txt")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[test]
    fn test_materialize_directory_idempotent() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![
            ArchiveEntry::directory("a"),
            ArchiveEntry::file("a/x.txt", b"x".to_vec()),
            ArchiveEntry::directory("a"),
        ];

        let summary = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        )
        .expect("repeated directory entries should be tolerated");

        assert_eq!(summary.directories, 2);
        assert_eq!(summary.files, 1);
        assert!(temp.path().join("a/x.txt").is_file());
    }

    #[test]
    fn test_materialize_path_escape_aborts() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![
            ArchiveEntry::file("ok.txt", b"fine".to_vec()),
            ArchiveEntry::file("../evil.txt", b"nope".to_vec()),
        ];

        let result = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        );
        assert!(matches!(result, Err(ExtractError::PathEscape { .. })));
        // Entries before the escape were already materialized.
        assert!(temp.path().join("ok.txt").is_file());
        assert!(!temp.path().parent().unwrap().join("evil.txt").exists());
    }

    #[test]
    fn test_unknown_kind_skipped_with_warning() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![
            ArchiveEntry {
                path: PathBuf::from("dev/null"),
                kind: EntryKind::Unknown {
                    kind: "character device".to_string(),
                },
                data: Vec::new(),
                attributes: EntryAttributes::default(),
            },
            ArchiveEntry::file("after.txt", b"still here".to_vec()),
        ];

        let mut sink = RecordingSink::default();
        let summary = materialize(&entries, &dest, &ExtractOptions::default(), &mut sink)
            .expect("unknown kinds should not fail the run");

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.files, 1);
        assert_eq!(sink.warnings.len(), 1);
        assert!(sink.warnings[0].contains("character device"));
        assert!(sink.warnings[0].contains("dev/null"));
        assert!(temp.path().join("after.txt").is_file());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_created_without_attributes() {
        use std::time::Duration;
        use std::time::UNIX_EPOCH;

        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let stamp = UNIX_EPOCH + Duration::from_secs(1_400_000_000);
        let entries = vec![
            ArchiveEntry::file("target.txt", b"data".to_vec()),
            ArchiveEntry::symlink("link", "target.txt").with_attributes(EntryAttributes {
                modified: Some(stamp),
                permissions: Some(0o777),
                ..Default::default()
            }),
        ];

        let summary = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        )
        .expect("materialize should succeed");

        assert_eq!(summary.symlinks, 1);
        let link = temp.path().join("link");
        let meta = fs::symlink_metadata(&link).unwrap();
        assert!(meta.file_type().is_symlink());
        // The link itself keeps its creation-time mtime.
        assert_ne!(meta.modified().unwrap(), stamp);
        assert_eq!(fs::read(&link).unwrap(), b"data");
    }

    #[test]
    fn test_symlink_empty_target_fails() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![ArchiveEntry::symlink("broken", "")];

        let result = materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        );
        assert!(matches!(
            result,
            Err(ExtractError::LinkTargetMissing { .. })
        ));
    }

    #[test]
    fn test_directory_mtime_applied_after_children() {
        use std::time::Duration;
        use std::time::UNIX_EPOCH;

        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let dir_stamp = UNIX_EPOCH + Duration::from_secs(1_300_000_000);
        let entries = vec![
            ArchiveEntry::directory("parent").with_attributes(EntryAttributes {
                modified: Some(dir_stamp),
                ..Default::default()
            }),
            ArchiveEntry::file("parent/child.txt", b"child".to_vec()),
        ];

        materialize(
            &entries,
            &dest,
            &ExtractOptions::default(),
            &mut NoopSink,
        )
        .expect("materialize should succeed");

        let dir_mtime = fs::metadata(temp.path().join("parent"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(dir_mtime, dir_stamp);
    }

    #[test]
    fn test_verbose_lines_and_legend() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![
            ArchiveEntry::directory("d1"),
            ArchiveEntry::file("d1/f1.txt", b"x".to_vec()),
        ];

        let mut sink = RecordingSink::default();
        let options = ExtractOptions {
            verbose: true,
            ..Default::default()
        };
        materialize(&entries, &dest, &options, &mut sink).expect("materialize should succeed");

        assert_eq!(sink.lines[0], LEGEND);
        assert_eq!(sink.lines[1], "d: d1");
        assert_eq!(sink.lines[2], "f: d1/f1.txt");
    }

    #[test]
    fn test_quiet_run_emits_no_lines() {
        let temp = TempDir::new().unwrap();
        let dest = dest_in(&temp);
        let entries = vec![ArchiveEntry::file("f.txt", b"x".to_vec())];

        let mut sink = RecordingSink::default();
        materialize(&entries, &dest, &ExtractOptions::default(), &mut sink)
            .expect("materialize should succeed");
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_render_listing_pure() {
        let temp = TempDir::new().unwrap();
        let entries = vec![
            ArchiveEntry::directory("docs"),
            ArchiveEntry::file("docs/readme.md", b"hi".to_vec()),
            ArchiveEntry::symlink("latest", "docs/readme.md"),
        ];

        let lines = render_listing(&entries);
        assert_eq!(lines[0], LEGEND);
        assert_eq!(lines[1], "d: docs");
        assert_eq!(lines[2], "f: docs/readme.md");
        assert_eq!(lines[3], "l: latest -> docs/readme.md");
        // Listing must not create anything.
        assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
    }
}
