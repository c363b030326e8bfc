//! Test-program discovery.
//!
//! Walks a fixture tree and returns the relative path of every file whose
//! name ends with the configured suffix. Paths always use `/` separators
//! regardless of host convention; they are the test identities used in
//! reporting. Entries are visited in sorted order per directory so the
//! result is deterministic across filesystems.

use std::fs;
use std::path::Path;

use super::error::HarnessError;

/// Recursively enumerate matching files under `root`.
///
/// Any unreadable directory is a fatal [`HarnessError::Discovery`]; a
/// partial test set is never returned.
pub fn discover(root: &Path, suffix: &str) -> Result<Vec<String>, HarnessError> {
    let mut found = Vec::new();
    walk(root, suffix, "", &mut found)?;
    Ok(found)
}

fn walk(
    dir: &Path,
    suffix: &str,
    prefix: &str,
    found: &mut Vec<String>,
) -> Result<(), HarnessError> {
    let read_error = |source| HarnessError::Discovery {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };

        if entry.path().is_dir() {
            walk(&entry.path(), suffix, &rel, found)?;
        } else if name.ends_with(suffix) {
            found.push(rel);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tree_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tree")
    }

    #[test]
    fn finds_exactly_the_matching_files_with_nesting() {
        let paths = discover(&tree_root(), ".lox").unwrap();
        assert_eq!(paths, vec!["a.lox", "sub/b.lox", "sub/deep/c.lox"]);
    }

    #[test]
    fn suffix_filter_excludes_everything_else() {
        let paths = discover(&tree_root(), ".txt").unwrap();
        assert_eq!(paths, vec!["notes.txt"]);
    }

    #[test]
    fn unreadable_root_is_fatal() {
        let missing = tree_root().join("no-such-dir");
        let err = discover(&missing, ".lox").unwrap_err();
        assert!(matches!(err, HarnessError::Discovery { .. }));
    }
}
