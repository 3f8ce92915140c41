//! Subprocess execution for the packaging tool and its prerequisites.

use crate::error::{BuildError, Result};
use std::fmt;
use std::future::Future;
use std::path::Path;

/// A program and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a subprocess terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ToolExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs external commands.
pub trait CommandRunner {
    /// Runs `invocation` to completion inside `work_dir`.
    ///
    /// Only spawn failures are errors; a non-zero exit is reported through
    /// [`ToolExit`] for the caller to interpret.
    fn run(
        &self,
        invocation: &Invocation,
        work_dir: &Path,
    ) -> impl Future<Output = Result<ToolExit>> + Send;
}

/// [`CommandRunner`] that spawns real processes with inherited stdio.
///
/// There is no timeout: a packaging build may legitimately take a long time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation, work_dir: &Path) -> Result<ToolExit> {
        log::debug!("Running `{}` in {}", invocation, work_dir.display());

        let status = tokio::process::Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(work_dir)
            .status()
            .await
            .map_err(|error| BuildError::CommandFailed {
                command: invocation.to_string(),
                error,
            })?;

        log::debug!("`{}` exited with {:?}", invocation.program(), status.code());
        Ok(status.into())
    }
}

/// Runs the packaging tool and turns an unsuccessful exit into
/// [`BuildError::BuildFailure`].
pub async fn run_build(
    runner: &impl CommandRunner,
    invocation: &Invocation,
    work_dir: &Path,
) -> Result<()> {
    if !work_dir.is_dir() {
        return Err(BuildError::ToolDirMissing {
            path: work_dir.to_path_buf(),
        });
    }

    let exit = runner.run(invocation, work_dir).await?;
    if !exit.success() {
        return Err(BuildError::BuildFailure { code: exit.code });
    }
    Ok(())
}
