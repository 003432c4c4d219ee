//! In-place edits of a cloned template
//!
//! Files are read whole, transformed in memory, and written back whole.
//! Writes never create missing parent directories.

use crate::error::{FsOperation, Result, ScaffoldError};
use std::io;
use std::path::Path;
use tokio::fs;

/// Remove `path` and everything below it. Missing paths are a no-op.
pub async fn remove_tree(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ScaffoldError::fs(FsOperation::Inspect, path, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match removed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ScaffoldError::fs(FsOperation::Remove, path, e)),
    }
}

/// Replace every literal occurrence of `token` with `value`
pub fn replace_all(content: &str, token: &str, value: &str) -> (String, usize) {
    if token.is_empty() {
        return (content.to_string(), 0);
    }
    let count = content.matches(token).count();
    if count == 0 {
        return (content.to_string(), 0);
    }
    (content.replace(token, value), count)
}

/// Drop every line containing `marker` (case-sensitive substring).
///
/// Remaining lines keep their exact bytes, line endings included.
pub fn remove_lines_containing(content: &str, marker: &str) -> (String, usize) {
    if marker.is_empty() {
        return (content.to_string(), 0);
    }
    let mut removed = 0;
    let kept: String = content
        .split_inclusive('\n')
        .filter(|line| {
            let hit = line.contains(marker);
            if hit {
                removed += 1;
            }
            !hit
        })
        .collect();
    (kept, removed)
}

/// Apply `transform` to the file at `path`; returns the transform's count.
/// The file is rewritten only when the count is non-zero.
async fn rewrite<F>(path: &Path, transform: F) -> Result<usize>
where
    F: FnOnce(&str) -> (String, usize),
{
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScaffoldError::fs(FsOperation::Read, path, e))?;

    let (updated, count) = transform(&content);
    if count > 0 {
        fs::write(path, updated)
            .await
            .map_err(|e| ScaffoldError::fs(FsOperation::Write, path, e))?;
    }
    Ok(count)
}

/// Replace `token` with `value` in the file at `path`; returns occurrences replaced
pub async fn replace_in_file(path: &Path, token: &str, value: &str) -> Result<usize> {
    rewrite(path, |content| replace_all(content, token, value)).await
}

/// Drop lines containing `marker` from the file at `path`; returns lines removed
pub async fn remove_lines_in_file(path: &Path, marker: &str) -> Result<usize> {
    rewrite(path, |content| remove_lines_containing(content, marker)).await
}
