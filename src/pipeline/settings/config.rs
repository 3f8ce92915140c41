//! Build parameters read from the environment.

use super::Platform;
use crate::error::{BuildError, Result};
use std::collections::HashMap;

/// Window height used when `HEIGHT` is absent or invalid.
pub const DEFAULT_HEIGHT: u32 = 780;

/// Window width used when `WIDTH` is absent or invalid.
pub const DEFAULT_WIDTH: u32 = 1200;

/// Read-only key/value source of build parameters.
pub trait ConfigSource {
    /// Returns the raw value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Parses a boolean build flag.
///
/// Only the exact string `"true"` is true. `"TRUE"`, `"1"`, `"yes"`, the empty
/// string and an unset key are all false.
pub fn parse_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Validated build configuration.
///
/// Created once per run by [`BuildConfig::load`] and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    url: String,
    name: String,
    icon: Option<String>,
    height: u32,
    width: u32,
    hide_title_bar: bool,
    fullscreen: bool,
    multi_arch: bool,
    targets: Option<String>,
    safe_domain: Option<String>,
    platform: Platform,
}

impl BuildConfig {
    /// Reads and validates the build parameters.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Validation`] listing every required key
    /// (`URL`, `NAME`) that is unset or empty.
    pub fn load(source: &impl ConfigSource, platform: Platform) -> Result<Self> {
        let url = non_empty(source.get("URL"));
        let name = non_empty(source.get("NAME"));

        let (url, name) = match (url, name) {
            (Some(url), Some(name)) => (url, name),
            (url, name) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push("URL".to_string());
                }
                if name.is_none() {
                    missing.push("NAME".to_string());
                }
                return Err(BuildError::Validation { missing });
            }
        };

        let flag = |key: &str| parse_flag(source.get(key).as_deref());

        Ok(Self {
            url,
            name,
            icon: non_empty(source.get("ICON")),
            height: dimension(source, "HEIGHT", DEFAULT_HEIGHT),
            width: dimension(source, "WIDTH", DEFAULT_WIDTH),
            hide_title_bar: flag("HIDE_TITLE_BAR"),
            fullscreen: flag("FULLSCREEN"),
            multi_arch: flag("MULTI_ARCH"),
            targets: non_empty(source.get("TARGETS")),
            safe_domain: non_empty(source.get("SAFE_DOMAIN")),
            platform,
        })
    }

    /// URL the packaged app wraps.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Artifact base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote icon URI.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Window height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Window width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn hide_title_bar(&self) -> bool {
        self.hide_title_bar
    }

    /// `FULLSCREEN` input; rendered as `--resize` in the command.
    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Raw `MULTI_ARCH` input, regardless of platform.
    pub fn multi_arch(&self) -> bool {
        self.multi_arch
    }

    /// True when a universal build was requested and the platform supports it.
    pub fn wants_multi_arch(&self) -> bool {
        self.multi_arch && self.platform.supports_multi_arch()
    }

    pub fn targets(&self) -> Option<&str> {
        self.targets.as_deref()
    }

    pub fn safe_domain(&self) -> Option<&str> {
        self.safe_domain.as_deref()
    }

    /// Platform the configuration was loaded for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Label/value rows describing the parameters, for the start-of-run banner.
    pub fn parameter_table(&self) -> Vec<(&'static str, String)> {
        let opt = |v: Option<&str>| v.unwrap_or("not set").to_string();
        vec![
            ("URL", self.url.clone()),
            ("Name", self.name.clone()),
            ("Icon", opt(self.icon())),
            ("Height", self.height.to_string()),
            ("Width", self.width.to_string()),
            ("Hide Title Bar", self.hide_title_bar.to_string()),
            ("Fullscreen", self.fullscreen.to_string()),
            ("Multi Arch (Mac only)", self.multi_arch.to_string()),
            ("Targets", opt(self.targets())),
            ("Safe Domain", opt(self.safe_domain())),
        ]
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn dimension(source: &impl ConfigSource, key: &str, default: u32) -> u32 {
    let Some(raw) = non_empty(source.get(key)) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            log::warn!("Ignoring invalid {key}={raw:?}, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_flag_accepts_only_literal_true() {
        assert!(parse_flag(Some("true")));
        for value in ["TRUE", "True", "1", "yes", "false", "", " true"] {
            assert!(!parse_flag(Some(value)), "{value:?} must be false");
        }
        assert!(!parse_flag(None));
    }

    #[test]
    fn load_applies_defaults() {
        let config = BuildConfig::load(
            &source(&[("URL", "https://example.com"), ("NAME", "MyApp")]),
            Platform::Linux,
        )
        .unwrap();

        assert_eq!(config.height(), 780);
        assert_eq!(config.width(), 1200);
        assert_eq!(config.icon(), None);
        assert!(!config.hide_title_bar());
        assert!(!config.fullscreen());
        assert!(!config.multi_arch());
        assert_eq!(config.targets(), None);
    }

    #[test]
    fn load_reports_all_missing_keys() {
        let err = BuildConfig::load(&source(&[]), Platform::Linux).unwrap_err();
        match err {
            BuildError::Validation { missing } => assert_eq!(missing, ["URL", "NAME"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let err = BuildConfig::load(
            &source(&[("URL", "https://example.com"), ("NAME", "")]),
            Platform::Linux,
        )
        .unwrap_err();
        match err {
            BuildError::Validation { missing } => assert_eq!(missing, ["NAME"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_dimensions_fall_back_to_defaults() {
        let config = BuildConfig::load(
            &source(&[
                ("URL", "https://example.com"),
                ("NAME", "MyApp"),
                ("HEIGHT", "tall"),
                ("WIDTH", "0"),
            ]),
            Platform::Linux,
        )
        .unwrap();
        assert_eq!(config.height(), DEFAULT_HEIGHT);
        assert_eq!(config.width(), DEFAULT_WIDTH);
    }

    #[test]
    fn explicit_dimensions_are_used() {
        let config = BuildConfig::load(
            &source(&[
                ("URL", "https://example.com"),
                ("NAME", "MyApp"),
                ("HEIGHT", "600"),
                ("WIDTH", "800"),
            ]),
            Platform::Linux,
        )
        .unwrap();
        assert_eq!((config.height(), config.width()), (600, 800));
    }

    #[test]
    fn multi_arch_only_wanted_on_macos() {
        let pairs = [
            ("URL", "https://example.com"),
            ("NAME", "MyApp"),
            ("MULTI_ARCH", "true"),
        ];
        let mac = BuildConfig::load(&source(&pairs), Platform::Macos).unwrap();
        let linux = BuildConfig::load(&source(&pairs), Platform::Linux).unwrap();

        assert!(mac.wants_multi_arch());
        assert!(linux.multi_arch());
        assert!(!linux.wants_multi_arch());
    }

    #[test]
    fn parameter_table_marks_unset_values() {
        let config = BuildConfig::load(
            &source(&[("URL", "https://example.com"), ("NAME", "MyApp")]),
            Platform::Linux,
        )
        .unwrap();
        let table = config.parameter_table();
        assert!(table.contains(&("Icon", "not set".to_string())));
        assert!(table.contains(&("Name", "MyApp".to_string())));
    }
}
