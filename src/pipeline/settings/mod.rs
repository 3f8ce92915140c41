//! Build configuration and platform identity.

mod config;
mod platform;

pub use config::{
    BuildConfig, ConfigSource, DEFAULT_HEIGHT, DEFAULT_WIDTH, ProcessEnv, parse_flag,
};
pub use platform::Platform;
