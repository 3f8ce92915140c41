//! Packaging command construction.
//!
//! [`CommandSpec::build`] is a pure function of the configuration (which
//! carries the platform) and the icon path. Flags are appended in a fixed order so the
//! rendered invocation is reproducible across runs.

use super::runner::Invocation;
use super::settings::BuildConfig;
use std::fmt;
use std::path::Path;

/// Entry point of the packaging tool, relative to its directory.
pub const TOOL_ENTRY: &str = "cli.js";

/// Default runtime used to launch [`TOOL_ENTRY`].
pub const DEFAULT_RUNTIME: &str = "node";

/// A single command-line flag with an optional value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    name: &'static str,
    value: Option<String>,
}

impl Flag {
    fn switch(name: &'static str) -> Self {
        Self { name, value: None }
    }

    fn with_value(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(value.into()),
        }
    }

    /// Flag name including the leading dashes.
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Fully assembled packaging tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    runtime: String,
    url: String,
    flags: Vec<Flag>,
}

impl CommandSpec {
    /// Builds the invocation for `config` on `platform`.
    ///
    /// `icon` is the path produced by the icon step, if any; it is appended
    /// last as `--icon <path>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use pake_build::pipeline::{BuildConfig, CommandSpec, Platform};
    ///
    /// let env: HashMap<String, String> = [("URL", "https://example.com"), ("NAME", "MyApp")]
    ///     .into_iter()
    ///     .map(|(k, v)| (k.to_string(), v.to_string()))
    ///     .collect();
    /// let config = BuildConfig::load(&env, Platform::Linux).unwrap();
    /// let spec = CommandSpec::build(&config, None);
    ///
    /// assert_eq!(
    ///     spec.to_string(),
    ///     "node cli.js https://example.com --name MyApp --height 780 --width 1200 --show-system-tray"
    /// );
    /// ```
    pub fn build(config: &BuildConfig, icon: Option<&Path>) -> Self {
        let platform = config.platform();
        let mut flags = vec![
            Flag::with_value("--name", config.name()),
            Flag::with_value("--height", config.height().to_string()),
            Flag::with_value("--width", config.width().to_string()),
        ];

        if config.hide_title_bar() {
            flags.push(Flag::switch("--hide-title-bar"));
        }
        if config.fullscreen() {
            flags.push(Flag::switch("--resize"));
        }
        if let Some(domain) = config.safe_domain() {
            flags.push(Flag::with_value("--safe-domain", domain));
        }
        if let Some(targets) = config.targets() {
            flags.push(Flag::with_value("--targets", targets));
        }
        if platform.shows_system_tray() {
            flags.push(Flag::switch("--show-system-tray"));
        }
        if config.wants_multi_arch() {
            flags.push(Flag::switch("--multi-arch"));
        }
        if let Some(icon) = icon {
            flags.push(Flag::with_value("--icon", icon.display().to_string()));
        }

        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            url: config.url().to_string(),
            flags,
        }
    }

    /// Replaces the runtime program used to launch the tool entry point.
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// True when a flag with `name` is present.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name)
    }

    /// Arguments passed to the runtime: entry point, URL, then flags.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![TOOL_ENTRY.to_string(), self.url.clone()];
        for flag in &self.flags {
            args.push(flag.name.to_string());
            if let Some(value) = &flag.value {
                args.push(value.clone());
            }
        }
        args
    }

    /// Program and arguments for spawning, without a shell.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.runtime.clone(), self.args())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.runtime)?;
        for arg in self.args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
