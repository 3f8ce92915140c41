//! Build pipeline orchestration.
//!
//! [`Pipeline`] runs the stages strictly in order:
//!
//! 1. validate configuration
//! 2. check the tool directory, register the multi-arch target when needed
//! 3. acquire the icon (bounded, never fatal)
//! 4. build the command
//! 5. run the packaging tool
//! 6. collect artifacts
//!
//! Stages 2-4 are [`Pipeline::prepare`], stages 5-6 are [`Pipeline::build`],
//! so callers can show the command before the tool starts. Any fatal error
//! stops the run in [`Stage::Failed`] and is returned as a [`StageError`]
//! naming the last completed stage; nothing is retried.

use super::artifacts::ArtifactCollector;
use super::command::{CommandSpec, DEFAULT_RUNTIME};
use super::icon::{AssetAcquirer, DEFAULT_ICON_TIMEOUT, IconAsset, IconFetcher};
use super::runner::{self, CommandRunner};
use super::settings::{BuildConfig, ConfigSource, Platform};
use super::toolchain;
use crate::error::{BuildError, Result};
use std::fmt;
use thiserror::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Progress of a pipeline run.
///
/// Stages only move forward; `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Validated,
    ToolchainReady,
    AssetResolved,
    CommandBuilt,
    Built,
    Collected,
    Done,
    Failed,
}

impl Stage {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Validated => "validated",
            Self::ToolchainReady => "toolchain ready",
            Self::AssetResolved => "asset resolved",
            Self::CommandBuilt => "command built",
            Self::Built => "built",
            Self::Collected => "collected",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A fatal error and the last stage completed before it.
///
/// The run itself ends in [`Stage::Failed`].
#[derive(Debug, Error)]
#[error("{error}")]
pub struct StageError {
    pub completed: Stage,
    #[source]
    pub error: BuildError,
}

impl StageError {
    /// Terminal stage of the failed run.
    pub fn stage(&self) -> Stage {
        Stage::Failed
    }
}

impl From<StageError> for BuildError {
    fn from(failure: StageError) -> Self {
        failure.error
    }
}

/// Everything decided before the packaging tool runs.
#[derive(Debug)]
pub struct PreparedBuild {
    name: String,
    command: CommandSpec,
    icon: IconAsset,
    collector: ArtifactCollector,
    stage: Stage,
}

impl PreparedBuild {
    /// Command that [`Pipeline::build`] will run.
    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub fn icon(&self) -> &IconAsset {
        &self.icon
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct BuildReport {
    /// Always [`Stage::Done`].
    pub stage: Stage,
    pub command: CommandSpec,
    pub icon: IconAsset,
    /// Entries of the output directory after collection.
    pub artifacts: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Sequences the build stages.
///
/// The target platform comes from the [`BuildConfig`] being built.
#[derive(Debug)]
pub struct Pipeline<R, F> {
    runner: R,
    acquirer: AssetAcquirer<F>,
    runtime: String,
}

impl<R: CommandRunner, F: IconFetcher> Pipeline<R, F> {
    /// Creates a pipeline with the default icon timeout and `node` runtime.
    pub fn new(runner: R, fetcher: F) -> Self {
        Self {
            runner,
            acquirer: AssetAcquirer::new(fetcher, DEFAULT_ICON_TIMEOUT),
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }

    /// Overrides the icon download time limit.
    pub fn icon_timeout(mut self, timeout: Duration) -> Self {
        self.acquirer = AssetAcquirer::new(self.acquirer.into_fetcher(), timeout);
        self
    }

    /// Overrides the program used to launch the tool entry point.
    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Loads the configuration for `platform` from `source` and runs the build.
    ///
    /// Validation happens before any subprocess, network or filesystem
    /// access.
    pub async fn run_from_source(
        &self,
        source: &impl ConfigSource,
        platform: Platform,
        tool_dir: &Path,
    ) -> std::result::Result<BuildReport, StageError> {
        let config = BuildConfig::load(source, platform).map_err(|e| fail(Stage::Start, e))?;
        self.run(&config, tool_dir).await
    }

    /// Runs the build for an already validated configuration.
    pub async fn run(
        &self,
        config: &BuildConfig,
        tool_dir: &Path,
    ) -> std::result::Result<BuildReport, StageError> {
        let prepared = self.prepare(config, tool_dir).await?;
        self.build(prepared).await
    }

    /// Sets up the toolchain, resolves the icon, builds the command and
    /// creates the output directories.
    pub async fn prepare(
        &self,
        config: &BuildConfig,
        tool_dir: &Path,
    ) -> std::result::Result<PreparedBuild, StageError> {
        let mut stage = Stage::Validated;
        let prepared = self.prepare_stages(config, tool_dir, &mut stage).await;
        prepared.map_err(|e| fail(stage, e))
    }

    /// Runs the packaging tool and collects its artifacts.
    pub async fn build(
        &self,
        prepared: PreparedBuild,
    ) -> std::result::Result<BuildReport, StageError> {
        let mut stage = prepared.stage;
        let report = self.build_stages(prepared, &mut stage).await;
        report.map_err(|e| fail(stage, e))
    }

    async fn prepare_stages(
        &self,
        config: &BuildConfig,
        tool_dir: &Path,
        stage: &mut Stage,
    ) -> Result<PreparedBuild> {
        if !tool_dir.is_dir() {
            return Err(BuildError::ToolDirMissing {
                path: tool_dir.to_path_buf(),
            });
        }

        if config.wants_multi_arch() {
            toolchain::ensure_multi_arch_target(&self.runner, tool_dir).await?;
        }
        advance(stage, Stage::ToolchainReady);

        let icon = self.acquirer.acquire(config, tool_dir).await;
        advance(stage, Stage::AssetResolved);

        let command = CommandSpec::build(config, icon.path()).with_runtime(&self.runtime);
        log::info!("Final build parameters: {}", command);
        advance(stage, Stage::CommandBuilt);

        let collector = ArtifactCollector::new(tool_dir);
        collector.prepare().await?;

        Ok(PreparedBuild {
            name: config.name().to_string(),
            command,
            icon,
            collector,
            stage: *stage,
        })
    }

    async fn build_stages(&self, prepared: PreparedBuild, stage: &mut Stage) -> Result<BuildReport> {
        let PreparedBuild {
            name,
            command,
            icon,
            collector,
            ..
        } = prepared;

        log::info!("Starting build process...");
        runner::run_build(&self.runner, &command.invocation(), collector.work_dir()).await?;
        advance(stage, Stage::Built);

        let artifacts = collector.collect(&name).await?;
        advance(stage, Stage::Collected);

        advance(stage, Stage::Done);
        Ok(BuildReport {
            stage: *stage,
            command,
            icon,
            artifacts,
            output_dir: collector.output_dir(),
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(
        !stage.is_terminal() && next > *stage,
        "stage cannot move from {stage} to {next}"
    );
    log::debug!("Stage: {} -> {}", stage, next);
    *stage = next;
}

fn fail(completed: Stage, error: BuildError) -> StageError {
    log::error!("Pipeline failed after stage {}: {}", completed, error);
    let mut stage = completed;
    advance(&mut stage, Stage::Failed);
    StageError { completed, error }
}
