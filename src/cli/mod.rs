//! Command line interface for the pake-cli build driver.
//!
//! Wires the environment, the terminal and the process working directory to
//! the [`crate::pipeline`] stages.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{BuildError, Result};
use crate::pipeline::{
    ArtifactCollector, BuildConfig, ConfigSource, HttpIconFetcher, Pipeline, Platform,
    ProcessEnv, ProcessRunner, WorkingDirGuard, toolchain,
};
use path_absolutize::Absolutize;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| BuildError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(&args);
    execute(&runtime, &ProcessEnv, Platform::current()).await
}

/// Runs one build with explicit configuration source and platform.
pub async fn execute(
    runtime: &RuntimeConfig,
    source: &impl ConfigSource,
    platform: Platform,
) -> Result<i32> {
    let out = runtime.output();

    out.section("Pake CLI Build Process")?;
    out.progress(&format!("Current platform: {platform}"))?;

    let config = BuildConfig::load(source, platform)?;

    out.progress("\nBuild Parameters:")?;
    for (label, value) in config.parameter_table() {
        out.indent(&format!("{label}: {value}"))?;
    }

    match toolchain::detect_runtime(runtime.node()) {
        Some(info) => out.info(&format!(
            "Runtime: {} ({})",
            info.path.display(),
            info.version.as_deref().unwrap_or("unknown version")
        ))?,
        None => out.warn(&format!("Runtime `{}` not found in PATH", runtime.node()))?,
    }

    let tool_dir = runtime.tool_dir().absolutize()?.into_owned();
    if !tool_dir.is_dir() {
        return Err(BuildError::ToolDirMissing { path: tool_dir });
    }

    let pipeline = Pipeline::new(ProcessRunner, HttpIconFetcher::new())
        .runtime(runtime.node())
        .icon_timeout(runtime.icon_timeout());

    let report = {
        let _cwd = WorkingDirGuard::enter(&tool_dir)?;
        let prepared = pipeline.prepare(&config, &tool_dir).await?;
        out.info(&format!("\nFinal build parameters: {}", prepared.command()))?;
        out.info("\nStarting build process...")?;
        pipeline.build(prepared).await?
    };

    out.success("\nBuild completed successfully!")?;

    out.info("\nGenerated files:")?;
    for file in ArtifactCollector::new(&tool_dir).list().await? {
        let kind = if file.is_dir { "[DIR] " } else { "[FILE]" };
        out.indent(&format!("{kind} {} ({} bytes)", file.name, file.size))?;
    }
    out.verbose(&format!("Output directory: {}", report.output_dir.display()))?;

    Ok(0)
}
