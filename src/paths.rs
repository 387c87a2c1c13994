/// Platform-specific default locations for the database and config file
///
/// Follows the XDG Base Directory layout on Linux and the platform
/// conventions on Windows and macOS.
use std::path::PathBuf;

const APP_DIR: &str = "funcsearch";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Resolve a base directory: `windows_var` on Windows, `macos_suffix` under
    /// `$HOME` on macOS, and `xdg_var` or `$HOME/xdg_fallback` elsewhere.
    fn base_dir(
        windows_var: &str,
        macos_suffix: &str,
        xdg_var: &str,
        xdg_fallback: &str,
    ) -> PathBuf {
        let home = || std::env::var("HOME").map(PathBuf::from);
        let resolved = if cfg!(target_os = "windows") {
            std::env::var(windows_var).map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            home().map(|h| h.join(macos_suffix))
        } else {
            std::env::var(xdg_var)
                .map(PathBuf::from)
                .or_else(|_| home().map(|h| h.join(xdg_fallback)))
        };
        resolved.unwrap_or_else(|_| PathBuf::from("."))
    }

    /// - Windows: %LOCALAPPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_DATA_HOME or ~/.local/share
    pub fn data_dir() -> PathBuf {
        Self::base_dir(
            "LOCALAPPDATA",
            "Library/Application Support",
            "XDG_DATA_HOME",
            ".local/share",
        )
    }

    /// - Windows: %APPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_CONFIG_HOME or ~/.config
    pub fn config_dir() -> PathBuf {
        Self::base_dir(
            "APPDATA",
            "Library/Application Support",
            "XDG_CONFIG_HOME",
            ".config",
        )
    }

    /// Returns: {data_dir}/funcsearch/lancedb
    pub fn default_lancedb_path() -> PathBuf {
        Self::data_dir().join(APP_DIR).join("lancedb")
    }

    /// Returns: {config_dir}/funcsearch/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join(APP_DIR).join("config.toml")
    }
}
