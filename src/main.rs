//! pake_build - CI build driver for pake-cli.
//!
//! Reads build parameters from the environment, runs pake-cli and collects
//! the packaged app into an `output/` directory.

use pake_build::cli::{self, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let output = OutputManager::new(false, false);

    // A panic inside the build surfaces as a JoinError and still exits non-zero
    let exit_code = match tokio::spawn(cli::run()).await {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            let _ = output.error(&format!("Build failed: {e}"));
            1
        }
        Err(e) => {
            let _ = output.error(&format!("Unexpected error: {e}"));
            1
        }
    };

    process::exit(exit_code);
}
