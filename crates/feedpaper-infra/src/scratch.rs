//! Scratch directory housekeeping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: usize,
}

/// Create `dir` if needed and return its absolute path.
pub fn ensure_dir(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    std::path::absolute(dir)
}

/// Remove every file under `dir` except those in `exclude`.
///
/// Subdirectories are descended into but left in place. Files that vanish
/// while walking are not an error.
pub fn clean(dir: &Path, exclude: &[PathBuf]) -> io::Result<CleanSummary> {
    let mut summary = CleanSummary::default();

    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_not_found(err.io_error()) => continue,
            Err(err) => return Err(err.into()),
        };

        if entry.file_type().is_dir() || exclude.iter().any(|p| p == entry.path()) {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                summary.removed += 1;
                tracing::debug!(path = %entry.path().display(), "removed");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

fn is_not_found(err: Option<&io::Error>) -> bool {
    err.is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(dir: &Path) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap().into_path())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn ensure_dir_creates_nested_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a/b/c");
        let abs = ensure_dir(&dir).unwrap();
        assert!(abs.is_dir());
        assert!(abs.is_absolute());
        // Idempotent.
        ensure_dir(&dir).unwrap();
    }

    #[test]
    fn keeps_only_excluded_file_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path();
        let keep = dir.join("feedpaper-new.jpg");
        fs::write(&keep, b"new").unwrap();
        fs::write(dir.join("feedpaper-old.jpg"), b"old").unwrap();
        fs::write(dir.join("feedpaper-feed.rss"), b"<rss/>").unwrap();
        fs::create_dir_all(dir.join("nested/deeper")).unwrap();
        fs::write(dir.join("nested/deeper/stray.png"), b"x").unwrap();

        let summary = clean(dir, std::slice::from_ref(&keep)).unwrap();
        assert_eq!(summary.removed, 3);
        assert_eq!(
            listing(dir),
            vec![keep.clone(), dir.join("nested"), dir.join("nested/deeper")]
        );
    }

    #[test]
    fn second_run_is_a_noop() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path();
        let keep = dir.join("keep.jpg");
        fs::write(&keep, b"k").unwrap();
        fs::write(dir.join("old.jpg"), b"o").unwrap();

        let exclude = vec![keep];
        clean(dir, &exclude).unwrap();
        let after_first = listing(dir);

        let summary = clean(dir, &exclude).unwrap();
        assert_eq!(summary.removed, 0);
        assert_eq!(listing(dir), after_first);
    }

    #[test]
    fn empty_exclusion_clears_all_files() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("a"), b"a").unwrap();
        fs::write(root.path().join("b"), b"b").unwrap();

        assert_eq!(clean(root.path(), &[]).unwrap().removed, 2);
        assert!(listing(root.path()).is_empty());
    }

    #[test]
    fn missing_directory_has_nothing_to_clean() {
        let root = tempfile::tempdir().unwrap();
        let summary = clean(&root.path().join("missing"), &[]).unwrap();
        assert_eq!(summary.removed, 0);
    }
}
