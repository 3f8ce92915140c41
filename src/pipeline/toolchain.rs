//! Host toolchain preparation and detection.

use super::runner::{CommandRunner, Invocation};
use crate::error::{BuildError, Result};
use std::path::{Path, PathBuf};

/// Extra Rust target needed for universal macOS builds.
pub const MULTI_ARCH_TARGET: &str = "aarch64-apple-darwin";

/// Registers [`MULTI_ARCH_TARGET`] with rustup.
///
/// Must succeed before a `--multi-arch` build is started.
pub async fn ensure_multi_arch_target(runner: &impl CommandRunner, work_dir: &Path) -> Result<()> {
    let invocation = Invocation::new("rustup", ["target", "add", MULTI_ARCH_TARGET]);
    log::info!("Adding {} target for multi-arch build", MULTI_ARCH_TARGET);

    let exit = runner
        .run(&invocation, work_dir)
        .await
        .map_err(|e| BuildError::ToolchainSetup {
            command: invocation.to_string(),
            reason: e.to_string(),
        })?;

    if !exit.success() {
        return Err(BuildError::ToolchainSetup {
            command: invocation.to_string(),
            reason: format!("Failed to add {MULTI_ARCH_TARGET} target (code {:?})", exit.code),
        });
    }
    Ok(())
}

/// Resolved runtime used to launch the packaging tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub path: PathBuf,
    pub version: Option<String>,
}

/// Locates `program` on `PATH` and asks it for its version.
///
/// Purely informational: `None` does not stop the build, the spawn itself
/// will report a missing runtime.
pub fn detect_runtime(program: &str) -> Option<RuntimeInfo> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());

            let version = match std::process::Command::new(&path).arg("--version").output() {
                Ok(output) if output.status.success() => {
                    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
                }
                Ok(output) => {
                    log::warn!(
                        "{} found at {} but --version failed (exit code: {:?})",
                        program,
                        path.display(),
                        output.status.code()
                    );
                    None
                }
                Err(e) => {
                    log::warn!("{} found at {} but failed to execute: {}", program, path.display(), e);
                    None
                }
            };

            Some(RuntimeInfo { path, version })
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::runner::ToolExit;
    use std::sync::Mutex;

    struct Recording {
        exit: Option<i32>,
        seen: Mutex<Vec<String>>,
    }

    impl CommandRunner for Recording {
        async fn run(&self, invocation: &Invocation, _work_dir: &Path) -> Result<ToolExit> {
            self.seen.lock().unwrap().push(invocation.to_string());
            Ok(ToolExit { code: self.exit })
        }
    }

    #[tokio::test]
    async fn adds_aarch64_target() {
        let runner = Recording {
            exit: Some(0),
            seen: Mutex::default(),
        };
        ensure_multi_arch_target(&runner, Path::new(".")).await.unwrap();
        assert_eq!(
            *runner.seen.lock().unwrap(),
            ["rustup target add aarch64-apple-darwin"]
        );
    }

    #[tokio::test]
    async fn failed_rustup_is_toolchain_error() {
        let runner = Recording {
            exit: Some(1),
            seen: Mutex::default(),
        };
        let err = ensure_multi_arch_target(&runner, Path::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::ToolchainSetup { .. }));
    }

    #[test]
    fn detect_missing_runtime() {
        assert!(detect_runtime("definitely_not_a_real_command_12345").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn detect_existing_runtime() {
        let info = detect_runtime("sh").unwrap();
        assert!(info.path.is_absolute());
    }
}
