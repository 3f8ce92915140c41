//! Host platform identity.

use std::fmt;

/// Operating system family the build runs on.
///
/// Drives the platform-gated parts of the packaging command and the icon
/// format. Read once from the host with [`Platform::current`] and passed
/// explicitly everywhere else, so tests can pick any platform.
///
/// # Examples
///
/// ```
/// use pake_build::pipeline::Platform;
///
/// assert_eq!(Platform::Macos.icon_extension(), Some("icns"));
/// assert!(!Platform::Macos.shows_system_tray());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Linux distributions
    Linux,
    /// macOS (darwin)
    Macos,
    /// Windows (win32)
    Windows,
    /// Anything else, e.g. the BSDs
    Other,
}

impl Platform {
    /// Detects the platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` style name to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::Macos,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Icon file extension the packaging tool expects on this platform.
    ///
    /// `None` means icons are not supported here.
    pub fn icon_extension(self) -> Option<&'static str> {
        match self {
            Self::Linux => Some("png"),
            Self::Macos => Some("icns"),
            Self::Windows => Some("ico"),
            Self::Other => None,
        }
    }

    /// Whether the app gets a system tray entry.
    pub fn shows_system_tray(self) -> bool {
        matches!(self, Self::Linux | Self::Windows)
    }

    /// Whether universal (x86_64 + aarch64) builds are possible.
    pub fn supports_multi_arch(self) -> bool {
        self == Self::Macos
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_os_maps_known_names() {
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(Platform::from_os("macos"), Platform::Macos);
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("freebsd"), Platform::Other);
    }

    #[test]
    fn icon_extensions() {
        assert_eq!(Platform::Linux.icon_extension(), Some("png"));
        assert_eq!(Platform::Windows.icon_extension(), Some("ico"));
        assert_eq!(Platform::Other.icon_extension(), None);
    }

    #[test]
    fn tray_and_multi_arch_gates() {
        assert!(Platform::Linux.shows_system_tray());
        assert!(Platform::Windows.shows_system_tray());
        assert!(!Platform::Other.shows_system_tray());

        assert!(Platform::Macos.supports_multi_arch());
        assert!(!Platform::Linux.supports_multi_arch());
    }
}
