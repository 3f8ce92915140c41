//! Artifact collection into the canonical output directory.
//!
//! The packaging tool writes `<name>.*` into its own directory, and depending
//! on version and platform also into `dist/` or `out/`. Everything ends up in
//! `output/` next to the tool entry point.

use super::utils::fs;
use crate::error::{BuildError, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Canonical output directory, relative to the tool directory.
pub const OUTPUT_DIR: &str = "output";

/// Directories created before the build besides [`OUTPUT_DIR`], so callers
/// running from the repository root or the tool package find an `output/`.
pub const MIRROR_DIRS: &[&str] = &["../output", "../../output", "dist", "out"];

/// Secondary artifact sources whose contents are copied into [`OUTPUT_DIR`].
pub const SECONDARY_DIRS: &[&str] = &["dist", "out"];

/// One row of the final output listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

/// Collects packaging artifacts produced in a tool directory.
#[derive(Debug, Clone)]
pub struct ArtifactCollector {
    work_dir: PathBuf,
}

impl ArtifactCollector {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Tool directory the artifacts are collected from.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Absolute path of the canonical output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join(OUTPUT_DIR)
    }

    /// Creates the output directory and its mirrors.
    ///
    /// Only the canonical directory is required; mirrors are best-effort.
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir()).await?;

        for dir in MIRROR_DIRS {
            let path = self.work_dir.join(dir);
            if let Err(e) = fs::create_dir_all(&path).await {
                log::warn!("Could not create {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    /// Moves `<name>.*` into the output directory and merges the contents of
    /// the secondary directories.
    ///
    /// Returns the sorted entries of the output directory.
    ///
    /// # Errors
    ///
    /// [`BuildError::CollectionFailure`] when no primary artifact exists or
    /// one cannot be moved. Secondary copy failures are only logged.
    pub async fn collect(&self, name: &str) -> Result<Vec<PathBuf>> {
        let output_dir = self.output_dir();
        fs::create_dir_all(&output_dir).await?;

        let primary = self.primary_artifacts(name)?;
        if primary.is_empty() {
            return Err(BuildError::CollectionFailure {
                reason: format!("no files matching {}.* in {}", name, self.work_dir.display()),
            });
        }

        for artifact in &primary {
            let dest = fs::move_into(artifact, &output_dir)
                .await
                .map_err(|e| BuildError::CollectionFailure {
                    reason: format!("{}: {}", artifact.display(), e),
                })?;
            log::info!("Moved {}", dest.display());
        }

        for dir in SECONDARY_DIRS {
            let source = self.work_dir.join(dir);
            if !source.is_dir() {
                log::debug!("Skipping missing {}", source.display());
                continue;
            }
            match fs::copy_dir_contents(&source, &output_dir).await {
                Ok(()) => log::debug!("Copied {} into {}", source.display(), OUTPUT_DIR),
                Err(e) => log::warn!("Ignoring copy failure from {}: {}", source.display(), e),
            }
        }

        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&output_dir)
            .await
            .fs_context("reading output directory", &output_dir)?;
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .fs_context("reading output directory", &output_dir)?
        {
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    /// Lists the output directory for the operator.
    pub async fn list(&self) -> Result<Vec<ListedFile>> {
        let output_dir = self.output_dir();
        let mut read_dir = tokio::fs::read_dir(&output_dir)
            .await
            .fs_context("reading output directory", &output_dir)?;

        let mut files = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .fs_context("reading output directory", &output_dir)?
        {
            let metadata = entry
                .metadata()
                .await
                .fs_context("reading file metadata", entry.path())?;
            files.push(ListedFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                is_dir: metadata.is_dir(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Top-level entries named `<name>.<anything>`.
    fn primary_artifacts(&self, name: &str) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/{}.*",
            glob::Pattern::escape(&self.work_dir.to_string_lossy()),
            glob::Pattern::escape(name)
        );
        let paths = glob::glob(&pattern).map_err(|e| BuildError::CollectionFailure {
            reason: format!("invalid artifact pattern {pattern}: {e}"),
        })?;

        let mut artifacts = Vec::new();
        for path in paths {
            let path = path.map_err(|e| BuildError::CollectionFailure {
                reason: e.to_string(),
            })?;
            artifacts.push(path);
        }
        Ok(artifacts)
    }
}
