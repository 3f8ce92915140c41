//! Error types for the build pipeline.
//!
//! [`BuildError`] covers every fatal outcome and terminates the run.
//! [`AssetError`] covers icon acquisition and is never fatal: the pipeline
//! logs it and continues without an icon.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Platform;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Fatal pipeline errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Required configuration keys are missing or empty
    #[error("{} required but not set", .missing.join(" and "))]
    Validation {
        /// Keys that were missing, in declaration order
        missing: Vec<String>,
    },

    /// The packaging tool directory does not exist
    #[error("{} directory not found", .path.display())]
    ToolDirMissing {
        /// Expected location of the packaging tool
        path: PathBuf,
    },

    /// A platform prerequisite command failed
    #[error("Toolchain setup failed: {command} ({reason})")]
    ToolchainSetup {
        /// Command that was run
        command: String,
        /// Exit code or spawn error
        reason: String,
    },

    /// A subprocess could not be started
    #[error("Failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command that failed to spawn
        command: String,
        /// Underlying spawn error
        error: std::io::Error,
    },

    /// The packaging tool exited unsuccessfully
    #[error("Build failed with code {}", .code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string()))]
    BuildFailure {
        /// Exit code, `None` when the process was killed by a signal
        code: Option<i32>,
    },

    /// Primary artifacts could not be moved into the output directory
    #[error("Failed to move built files to output directory: {reason}")]
    CollectionFailure {
        /// What went wrong
        reason: String,
    },

    /// Filesystem operation failed on a specific path
    #[error("Error {action} {}: {source}", .path.display())]
    Fs {
        /// Action being performed, e.g. "creating output directory"
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal icon acquisition errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// No icon format is known for this platform
    #[error("Unsupported platform for icon download: {0}")]
    UnsupportedPlatform(Platform),

    /// The download did not complete within the time limit
    #[error("Icon download timed out after {0} ms")]
    Timeout(u128),

    /// Connection or protocol failure
    #[error("Icon download failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Icon download returned HTTP {0}")]
    Status(u16),

    /// The icon could not be written to disk
    #[error("Failed to write icon to {}: {source}", .path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Attaches path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`BuildError::Fs`] naming the action and path.
    fn fs_context(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| BuildError::Fs {
            action,
            path: path.into(),
            source,
        })
    }
}
