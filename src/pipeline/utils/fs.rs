//! File system helpers for artifact collection.

use crate::error::{BuildError, ErrorExt, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Creates `path` and its parents. Succeeds if it already exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Moves a file or directory into `dest_dir`, keeping its file name.
///
/// Falls back to copy-and-delete when a plain rename is not possible
/// (e.g. across filesystems).
pub async fn move_into(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = src.file_name().ok_or_else(|| BuildError::CollectionFailure {
        reason: format!("{} has no file name", src.display()),
    })?;
    let dest = dest_dir.join(file_name);

    if fs::rename(src, &dest).await.is_ok() {
        return Ok(dest);
    }

    if src.is_dir() {
        copy_dir_contents(src, &dest).await?;
        fs::remove_dir_all(src)
            .await
            .fs_context("removing moved directory", src)?;
    } else {
        fs::copy(src, &dest).await.fs_context("copying file", &dest)?;
        fs::remove_file(src)
            .await
            .fs_context("removing moved file", src)?;
    }
    Ok(dest)
}

/// Recursively copies everything inside `from` into `to`, merging with
/// existing content and overwriting files of the same name.
///
/// Symlinks are followed and copied as regular files.
pub async fn copy_dir_contents(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(BuildError::Fs {
            action: "copying directory",
            path: from.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&to).fs_context("creating directory", &to)?;

        for entry in walkdir::WalkDir::new(&from).min_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| BuildError::Fs {
                action: "walking directory",
                path: from.clone(),
                source: e.into(),
            })?;
            let rel_path = entry
                .path()
                .strip_prefix(&from)
                .map_err(|e| BuildError::CollectionFailure {
                    reason: e.to_string(),
                })?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| BuildError::CollectionFailure {
        reason: format!("Directory copy task panicked: {}", e),
    })?
}
