//! Scoped change of the process working directory.

use crate::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Enters a directory and returns to the previous one when dropped.
///
/// The working directory is process-wide state; holding the guard for the
/// duration of the build guarantees it is restored on every exit path,
/// including early returns through `?` and panics that unwind.
#[derive(Debug)]
#[must_use = "the previous directory is restored when the guard is dropped"]
pub struct WorkingDirGuard {
    previous: PathBuf,
    entered: PathBuf,
}

impl WorkingDirGuard {
    /// Changes into `dir`.
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = std::env::current_dir().fs_context("reading current directory", ".")?;
        std::env::set_current_dir(dir).fs_context("entering directory", dir)?;
        log::debug!("Entered {}", dir.display());

        Ok(Self {
            previous,
            entered: dir.to_path_buf(),
        })
    }

    /// Directory that was active before [`enter`](Self::enter).
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::error!(
                "Failed to return from {} to {}: {}",
                self.entered.display(),
                self.previous.display(),
                e
            );
        } else {
            log::debug!("Returned to {}", self.previous.display());
        }
    }
}
