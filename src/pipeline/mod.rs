//! Build pipeline for pake-cli packaging.
//!
//! This module turns environment-sourced build parameters into a packaging
//! run and collects the resulting artifacts.
//!
//! # Example
//!
//! ```no_run
//! use pake_build::pipeline::{HttpIconFetcher, Pipeline, Platform, ProcessEnv, ProcessRunner};
//! use std::path::Path;
//!
//! # async fn example() -> pake_build::Result<()> {
//! let pipeline = Pipeline::new(ProcessRunner, HttpIconFetcher::new());
//! let report = pipeline
//!     .run_from_source(&ProcessEnv, Platform::current(), Path::new("node_modules/pake-cli"))
//!     .await?;
//!
//! for artifact in &report.artifacts {
//!     println!("{}", artifact.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`settings`] - configuration loading and platform identity
//! - [`icon`] - optional icon download
//! - [`command`] - packaging command construction
//! - [`runner`] - subprocess execution
//! - [`toolchain`] - rustup target registration and runtime detection
//! - [`artifacts`] - output directory preparation and artifact collection
//! - [`workdir`] - scoped working directory changes
//! - [`orchestrator`] - stage sequencing

pub mod artifacts;
pub mod command;
pub mod icon;
pub mod orchestrator;
pub mod runner;
pub mod settings;
pub mod toolchain;
pub mod utils;
pub mod workdir;

pub use artifacts::{ArtifactCollector, ListedFile, OUTPUT_DIR};
pub use command::CommandSpec;
pub use icon::{AssetAcquirer, HttpIconFetcher, IconAsset, IconFetcher};
pub use orchestrator::{BuildReport, Pipeline, PreparedBuild, Stage, StageError};
pub use runner::{CommandRunner, Invocation, ProcessRunner, ToolExit};
pub use settings::{BuildConfig, ConfigSource, Platform, ProcessEnv};
pub use workdir::WorkingDirGuard;
