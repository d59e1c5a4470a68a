//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/tagnotes/config.toml)
//! 3. Environment variables (TAGNOTES_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::capacity::DEFAULT_RECORD_TYPE;

/// Environment variable prefix
const ENV_PREFIX: &str = "TAGNOTES";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (the saved list, the default tag image)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File-backed tag used by `scan` when none is given
    #[serde(default)]
    pub tag_path: Option<PathBuf>,

    /// MIME type of the record written to tags
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// Seed a welcome note when no list has ever been saved
    #[serde(default = "default_seed_welcome")]
    pub seed_welcome: bool,

    /// Log file for `TAGNOTES_LOG` output (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tag_path: None,
            record_type: default_record_type(),
            seed_welcome: default_seed_welcome(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (TAGNOTES_DATA_DIR, TAGNOTES_TAG_PATH, TAGNOTES_RECORD_TYPE)
    /// 2. Config file (~/.config/tagnotes/config.toml or TAGNOTES_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_TAG_PATH", ENV_PREFIX)) {
            self.tag_path = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Ok(val) = std::env::var(format!("{}_RECORD_TYPE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.record_type = val;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with TAGNOTES_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tagnotes")
            .join("config.toml")
    }

    /// Get the path to the saved list
    pub fn list_path(&self) -> PathBuf {
        self.data_dir.join("list.payload")
    }

    /// Get the path of the undo record for the last import
    pub fn import_undo_path(&self) -> PathBuf {
        self.data_dir.join("last-import.json")
    }

    /// Get the tag image used when no tag is given explicitly
    pub fn tag_path(&self) -> PathBuf {
        self.tag_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("tag.json"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tagnotes")
}

fn default_record_type() -> String {
    DEFAULT_RECORD_TYPE.to_string()
}

fn default_seed_welcome() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serializes tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "TAGNOTES_DATA_DIR",
        "TAGNOTES_TAG_PATH",
        "TAGNOTES_RECORD_TYPE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tag_path.is_none());
        assert!(config.seed_welcome);
        assert_eq!(config.record_type, DEFAULT_RECORD_TYPE);
        assert!(config.data_dir.ends_with("tagnotes"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.list_path().ends_with("list.payload"));
        assert!(config.tag_path().ends_with("tag.json"));
        assert!(config.import_undo_path().ends_with("last-import.json"));

        let config = Config {
            tag_path: Some(PathBuf::from("/media/tag.json")),
            ..Config::default()
        };
        assert_eq!(config.tag_path(), PathBuf::from("/media/tag.json"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TAGNOTES_DATA_DIR", "/tmp/tagnotes-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/tagnotes-test"));
    }

    #[test]
    fn test_env_override_tag_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TAGNOTES_TAG_PATH", "/media/tag.json");
        config.apply_env_overrides();
        assert_eq!(config.tag_path, Some(PathBuf::from("/media/tag.json")));

        env::set_var("TAGNOTES_TAG_PATH", "");
        config.apply_env_overrides();
        assert!(config.tag_path.is_none());
    }

    #[test]
    fn test_env_override_record_type_ignores_empty() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("TAGNOTES_RECORD_TYPE", "text/plain");
        config.apply_env_overrides();
        assert_eq!(config.record_type, "text/plain");

        env::set_var("TAGNOTES_RECORD_TYPE", "");
        config.apply_env_overrides();
        assert_eq!(config.record_type, "text/plain");
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            data_dir: PathBuf::from("/data/tagnotes"),
            tag_path: Some(PathBuf::from("/media/tag.json")),
            record_type: "text/plain".to_string(),
            seed_welcome: false,
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("record_type"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.tag_path, config.tag_path);
        assert_eq!(parsed.record_type, config.record_type);
        assert!(!parsed.seed_welcome);
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str(r#"data_dir = "/custom/data""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.record_type, DEFAULT_RECORD_TYPE);
        assert!(config.seed_welcome);
    }

    #[test]
    fn test_load_from_path_missing_file_creates_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");

        env::set_var("TAGNOTES_DATA_DIR", &data_dir);
        let config = Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.data_dir, data_dir);
        assert!(data_dir.exists());
    }

    #[test]
    fn test_save_to_path_round_trips() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            seed_welcome: false,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(!loaded.seed_welcome);
    }
}
