//! Test file discovery and write-back

use crate::error::CodemodError;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

lazy_static! {
    /// Directory names never descended into
    static ref SKIPPED_DIR: Regex = Regex::new(r"^(node_modules|\..+)$").unwrap();
}

/// Collect the files to transform. Files named explicitly are always taken;
/// directories are walked recursively, keeping files whose names match
/// `include`. The result is sorted and free of duplicates.
pub fn collect_files(paths: &[PathBuf], include: &Regex) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for path in paths {
        if !path.exists() {
            return Err(CodemodError::MissingInput(path.clone()).into());
        }

        if path.is_file() {
            files.insert(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && matches_include(entry.path(), include) {
                files.insert(entry.into_path());
            }
        }
    }

    Ok(files.into_iter().collect())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| SKIPPED_DIR.is_match(name))
}

fn matches_include(path: &Path, include: &Regex) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| include.is_match(name))
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_INCLUDE;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_collect_walks_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = touch(root, "test/a.test.js");
        let b = touch(root, "test/nested/b.spec.ts");
        touch(root, "test/readme.md");
        touch(root, "node_modules/dep/index.js");
        touch(root, ".git/hooks/pre-commit.js");

        let include = Regex::new(DEFAULT_INCLUDE).unwrap();
        let files = collect_files(&[root.to_path_buf()], &include).unwrap();

        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_explicit_files_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let notes = touch(root, "notes.txt");
        let suite = touch(root, "suite.js");

        let include = Regex::new(DEFAULT_INCLUDE).unwrap();
        let files = collect_files(
            &[notes.clone(), root.to_path_buf(), suite.clone()],
            &include,
        )
        .unwrap();

        assert_eq!(files, vec![notes, suite]);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let include = Regex::new(DEFAULT_INCLUDE).unwrap();

        let err = collect_files(&[missing.clone()], &include).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodemodError>(),
            Some(CodemodError::MissingInput(path)) if *path == missing
        ));
    }

    #[test]
    fn test_read_and_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.js");

        write_file(&path, "let x;\n").unwrap();
        assert_eq!(read_file(&path).unwrap(), "let x;\n");
        assert!(read_file(&temp_dir.path().join("missing.js")).is_err());
    }
}
