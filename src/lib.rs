//! CI build driver for pake-cli.
//!
//! Reads build parameters from the environment, assembles the `pake-cli`
//! command line for the host platform, optionally downloads an icon, runs the
//! packaging tool and collects its artifacts into one `output/` directory.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{AssetError, BuildError, Result};
