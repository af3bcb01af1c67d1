//! Property tests for entry path resolution.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;
use unarc_core::DestDir;
use unarc_core::ExtractError;
use unarc_core::resolve_entry_path;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,11}".prop_filter("no dot-only segments", |s| {
        s != "." && s != ".."
    })
}

proptest! {
    /// Any path made of plain name segments resolves strictly inside the
    /// destination root.
    #[test]
    fn safe_relative_paths_stay_inside_root(segments in prop::collection::vec(segment(), 1..6)) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::ensure(temp.path(), false).unwrap();

        let entry_path: PathBuf = segments.iter().collect();
        let resolved = resolve_entry_path(&dest, &entry_path).expect("safe path should resolve");

        prop_assert!(resolved.starts_with(dest.as_path()));
        prop_assert_ne!(resolved.as_path(), dest.as_path());
    }

    /// A `..` component anywhere in the path is rejected, regardless of how
    /// many safe segments surround it.
    #[test]
    fn parent_component_always_rejected(
        before in prop::collection::vec(segment(), 0..4),
        after in prop::collection::vec(segment(), 0..4),
    ) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::ensure(temp.path(), false).unwrap();

        let mut entry_path = PathBuf::new();
        for s in &before {
            entry_path.push(s);
        }
        entry_path.push("..");
        for s in &after {
            entry_path.push(s);
        }

        let result = resolve_entry_path(&dest, &entry_path);
        let rejected = matches!(result, Err(ExtractError::PathEscape { .. }));
        prop_assert!(rejected, "{:?} should be rejected", entry_path);
    }

    /// `.` components are dropped without affecting the resolved location.
    #[test]
    fn current_dir_components_ignored(segments in prop::collection::vec(segment(), 1..4)) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::ensure(temp.path(), false).unwrap();

        let plain: PathBuf = segments.iter().collect();
        let mut dotted = PathBuf::from(".");
        for s in &segments {
            dotted.push(".");
            dotted.push(s);
        }

        let a = resolve_entry_path(&dest, &plain).unwrap();
        let b = resolve_entry_path(&dest, &dotted).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn absolute_paths_rejected() {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::ensure(temp.path(), false).unwrap();
    for path in ["/etc/passwd", "/", "/a/b"] {
        let result = resolve_entry_path(&dest, Path::new(path));
        assert!(
            matches!(result, Err(ExtractError::PathEscape { .. })),
            "{path} should be rejected"
        );
    }
}
