//! Configuration file support for persistent settings.
//!
//! Settings are read from a TOML file at `~/.config/cachedisk/config.toml`
//! (or the platform-specific equivalent). File values serve as defaults that
//! CLI arguments override.
//!
//! # Example config
//!
//! ```toml
//! dir = "~/.cache/myapp"
//!
//! [display]
//! binary = true
//!
//! [clear]
//! use_trash = false
//! yes = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can tell which values the file sets and
/// layer them under the CLI arguments.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Default cache directory for `du`, `clear` and `mark`
    pub dir: Option<PathBuf>,

    /// Display options
    #[serde(default)]
    pub display: FileDisplayConfig,

    /// Clear options
    #[serde(default)]
    pub clear: FileClearConfig,
}

/// Display options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileDisplayConfig {
    /// Use binary units (KiB) instead of decimal ones (kB)
    pub binary: Option<bool>,
}

/// Clear options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileClearConfig {
    /// Move subdirectories to the system trash instead of deleting them
    pub use_trash: Option<bool>,

    /// Skip the confirmation prompt
    pub yes: Option<bool>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// `None` if the platform config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cachedisk").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }

    /// The configured default directory, with `~` expanded.
    #[must_use]
    pub fn directory(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.dir.is_none());
        assert!(config.display.binary.is_none());
        assert!(config.clear.use_trash.is_none());
        assert!(config.clear.yes.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
dir = "~/.cache/myapp"

[display]
binary = false

[clear]
use_trash = true
yes = true
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.dir, Some(PathBuf::from("~/.cache/myapp")));
        assert_eq!(config.display.binary, Some(false));
        assert_eq!(config.clear.use_trash, Some(true));
        assert_eq!(config.clear.yes, Some(true));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = "[clear]\nuse_trash = true\n";
        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.dir.is_none());
        assert!(config.display.binary.is_none());
        assert_eq!(config.clear.use_trash, Some(true));
        assert!(config.clear.yes.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.dir.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = "[clear]\nuse_trash = \"sometimes\"\n";
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(p) = FileConfig::config_path() {
            assert!(p.ends_with("cachedisk/config.toml"));
        }
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = FileConfig::load_from(&temp.path().join("config.toml")).unwrap();

        assert!(config.dir.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "dir = \"/var/cache/app\"\n").unwrap();

        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.directory(), Some(PathBuf::from("/var/cache/app")));
    }

    #[test]
    fn test_load_from_invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "dir = [").unwrap();

        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let expanded = expand_tilde(Path::new("~/cache"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("cache"));
        }
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let path = PathBuf::from("/absolute/path");
        assert_eq!(expand_tilde(&path), path);
    }

    #[test]
    fn test_directory_expands_tilde() {
        let config: FileConfig = toml::from_str("dir = \"~/c\"\n").unwrap();

        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.directory(), Some(home.join("c")));
        }
    }
}
