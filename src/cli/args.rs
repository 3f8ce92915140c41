//! Command line argument parsing and validation.
//!
//! Build parameters (`URL`, `NAME`, ...) are read from the environment by
//! [`crate::pipeline::BuildConfig`]; these arguments only control how the
//! packaging tool is located and launched.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// CI build driver for pake-cli
#[derive(Parser, Debug)]
#[command(
    name = "pake_build",
    version,
    about = "Builds a desktop app package with pake-cli from environment parameters",
    long_about = "Builds a desktop app package with pake-cli from environment parameters.

Build parameters are read from the environment:
  URL, NAME (required), ICON, HEIGHT, WIDTH, HIDE_TITLE_BAR, FULLSCREEN,
  MULTI_ARCH, TARGETS, SAFE_DOMAIN

Boolean parameters are enabled only by the exact value \"true\".

Artifacts named NAME.* are collected into <tool-dir>/output.
Exit code 0 = build succeeded and artifacts were collected."
)]
pub struct Args {
    /// Directory containing the pake-cli entry point (cli.js)
    #[arg(
        long,
        env = "PAKE_CLI_DIR",
        value_name = "DIR",
        default_value = "node_modules/pake-cli"
    )]
    pub tool_dir: PathBuf,

    /// Program used to run cli.js
    #[arg(long, env = "PAKE_NODE", value_name = "PROGRAM", default_value = "node")]
    pub node: String,

    /// Icon download time limit in milliseconds
    #[arg(
        long,
        env = "PAKE_ICON_TIMEOUT_MS",
        value_name = "MS",
        default_value_t = 10_000
    )]
    pub icon_timeout_ms: u64,

    /// Print extra detail such as the output directory path
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.node.trim().is_empty() {
            return Err("--node cannot be empty".to_string());
        }
        if self.icon_timeout_ms == 0 {
            return Err("--icon-timeout-ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    tool_dir: PathBuf,
    node: String,
    icon_timeout: Duration,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            tool_dir: args.tool_dir.clone(),
            node: args.node.clone(),
            icon_timeout: Duration::from_millis(args.icon_timeout_ms),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    pub fn tool_dir(&self) -> &std::path::Path {
        &self.tool_dir
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn icon_timeout(&self) -> Duration {
        self.icon_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["pake_build"]).unwrap();
        assert_eq!(args.tool_dir, PathBuf::from("node_modules/pake-cli"));
        assert_eq!(args.node, "node");
        assert_eq!(args.icon_timeout_ms, 10_000);
        assert!(args.validate().is_ok());

        let runtime = RuntimeConfig::from(&args);
        assert_eq!(runtime.icon_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["pake_build", "-v", "-q"]).is_err());

        let args = Args::try_parse_from(["pake_build", "--verbose"]).unwrap();
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let args = Args::try_parse_from(["pake_build", "--icon-timeout-ms", "0"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn explicit_values() {
        let args = Args::try_parse_from([
            "pake_build",
            "--tool-dir",
            "/opt/pake",
            "--node",
            "/usr/local/bin/node",
        ])
        .unwrap();
        let runtime = RuntimeConfig::from(&args);
        assert_eq!(runtime.tool_dir(), std::path::Path::new("/opt/pake"));
        assert_eq!(runtime.node(), "/usr/local/bin/node");
    }
}
