//! Async file utilities for Lectern.
//!
//! Provides file discovery and reading operations used by the ingestion
//! driver.

use async_walkdir::{Filtering, WalkDir};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{Error, Result};

/// Directory names skipped by [`FindOptions::markdown`].
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules"];

/// Options for discovering files under a directory.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// File extension to match (without dot), e.g., "md"
    pub extension: Option<String>,
    /// Maximum directory depth to search (None = unlimited)
    pub max_depth: Option<usize>,
    /// Directory names that are never descended into
    pub exclude_dirs: Vec<String>,
}

impl FindOptions {
    /// Create options for finding markdown files, skipping dependency trees.
    pub fn markdown() -> Self {
        Self {
            extension: Some("md".to_string()),
            max_depth: None,
            exclude_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Replace the excluded directory names.
    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Set maximum search depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path to the file (search base joined with the relative path).
    pub path: PathBuf,
    /// Final path component.
    pub file_name: String,
    /// Path relative to the search base.
    pub relative_path: PathBuf,
}

/// Find all files matching criteria in a directory.
///
/// Results are sorted by path so repeated runs visit files in the same
/// order.
///
/// # Example
///
/// ```no_run
/// # use lectern_core::util::files::{find_all_files, FindOptions};
/// # use std::path::Path;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let files = find_all_files(Path::new("content"), FindOptions::markdown()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn find_all_files(base_path: &Path, options: FindOptions) -> Result<Vec<FileInfo>> {
    let excluded = options.exclude_dirs.clone();
    let mut walker = WalkDir::new(base_path).filter(move |entry| {
        let skip = entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.iter().any(|d| d == name));
        async move {
            if skip {
                Filtering::IgnoreDir
            } else {
                Filtering::Continue
            }
        }
    });

    let mut files = Vec::new();

    while let Some(entry_result) = walker.next().await {
        let entry = entry_result.map_err(|e| Error::io(e.into()))?;
        let path = entry.path();

        // Skip directories
        if path.is_dir() {
            continue;
        }

        let relative_path = path.strip_prefix(base_path).unwrap_or(&path).to_path_buf();

        // Check depth limit
        if let Some(max_depth) = options.max_depth {
            if relative_path.components().count() > max_depth {
                continue;
            }
        }

        // Check extension if specified
        if let Some(ext) = options.extension.as_deref() {
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                continue;
            }
        }

        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        files.push(FileInfo {
            path: base_path.join(&relative_path),
            file_name,
            relative_path,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::debug!("discovered {} files under {}", files.len(), base_path.display());
    Ok(files)
}

/// Read a file's contents as a string.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}

/// Read a file's raw bytes.
pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).await.map_err(|e| Error::io_with_path(e, path))
}

/// Check if a path exists.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Check if a path exists and is a directory.
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_find_all_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.md"), "# One").await.unwrap();
        fs::write(temp.path().join("two.md"), "# Two").await.unwrap();
        fs::write(temp.path().join("skip.txt"), "skip").await.unwrap();

        let files = find_all_files(temp.path(), FindOptions::markdown())
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn test_find_all_files_nested_and_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("root.md"), "root").await.unwrap();

        let subdir = temp.path().join("guides");
        fs::create_dir(&subdir).await.unwrap();
        fs::write(subdir.join("b.md"), "b").await.unwrap();
        fs::write(subdir.join("a.md"), "a").await.unwrap();

        let files = find_all_files(temp.path(), FindOptions::markdown())
            .await
            .unwrap();

        let relative: Vec<_> = files.iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("guides/a.md"),
                PathBuf::from("guides/b.md"),
                PathBuf::from("root.md"),
            ]
        );
    }

    #[tokio::test]
    async fn test_find_all_files_skips_node_modules() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep.md"), "keep").await.unwrap();

        let deps = temp.path().join("node_modules").join("pkg");
        fs::create_dir_all(&deps).await.unwrap();
        fs::write(deps.join("README.md"), "dependency").await.unwrap();

        let files = find_all_files(temp.path(), FindOptions::markdown())
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "keep.md");
    }

    #[tokio::test]
    async fn test_find_all_files_custom_excludes() {
        let temp = TempDir::new().unwrap();
        let drafts = temp.path().join("drafts");
        fs::create_dir(&drafts).await.unwrap();
        fs::write(drafts.join("wip.md"), "wip").await.unwrap();
        fs::write(temp.path().join("done.md"), "done").await.unwrap();

        let files = find_all_files(
            temp.path(),
            FindOptions::markdown().with_exclude_dirs(["drafts"]),
        )
        .await
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "done.md");
    }

    #[tokio::test]
    async fn test_find_all_files_max_depth() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("root.md"), "root").await.unwrap();

        let level1 = temp.path().join("level1");
        fs::create_dir(&level1).await.unwrap();
        fs::write(level1.join("file1.md"), "l1").await.unwrap();

        let files = find_all_files(temp.path(), FindOptions::markdown().with_max_depth(1))
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("root.md"));
    }

    #[tokio::test]
    async fn test_find_all_files_file_info() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test-file.md");
        fs::write(&file_path, "content").await.unwrap();

        let files = find_all_files(temp.path(), FindOptions::markdown())
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "test-file.md");
        assert_eq!(files[0].relative_path, PathBuf::from("test-file.md"));
        assert_eq!(files[0].path, file_path);
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let temp = TempDir::new().unwrap();
        let nonexistent = temp.path().join("nonexistent.md");

        let result = read_file(&nonexistent).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("nonexistent.md"));
    }

    #[tokio::test]
    async fn test_read_bytes() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("bytes.md");
        fs::write(&file_path, b"---\ntitle: x\n---\n").await.unwrap();

        let bytes = read_bytes(&file_path).await.unwrap();
        assert_eq!(bytes, b"---\ntitle: x\n---\n");
    }

    #[tokio::test]
    async fn test_exists_and_is_dir() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("exists.md");
        fs::write(&file_path, "content").await.unwrap();

        assert!(exists(&file_path).await);
        assert!(!exists(&temp.path().join("nonexistent.md")).await);
        assert!(is_dir(temp.path()).await);
        assert!(!is_dir(&file_path).await);
    }
}
