//! # Configuration
//!
//! Locates the data directory and manages `config.yaml` inside it.
//!
//! ## Data directory resolution
//!
//! 1. An explicit directory (the `--data-dir` flag or the
//!    `EXPENSE_TRACKER_DATA_DIR` environment variable)
//! 2. Otherwise `<platform data dir>/Expense Tracker`, unless that directory
//!    contains a `.expense_redirect` file naming another existing directory
//!
//! ## YAML Format
//!
//! ```yaml
//! currency_symbol: "$"
//! max_title_length: 256
//! date_format: iso
//! data_format_version: "1.0"
//! ```

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use shared::DateFormat;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const REDIRECT_FILE_NAME: &str = ".expense_redirect";
const DEFAULT_DIRECTORY_NAME: &str = "Expense Tracker";
const DATA_FORMAT_VERSION: &str = "1.0";

/// Tracker settings stored in the data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Symbol shown before amounts and stripped from amount input
    pub currency_symbol: String,
    /// Maximum title length accepted by the expense form, in characters
    pub max_title_length: usize,
    /// How dates are shown in the expense list
    pub date_format: DateFormat,
    /// Data format version for future migrations
    pub data_format_version: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            max_title_length: 256,
            date_format: DateFormat::Iso,
            data_format_version: DATA_FORMAT_VERSION.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load `config.yaml` from the data directory, writing the defaults if it
    /// doesn't exist yet
    pub fn load_or_create(data_directory: &Path) -> Result<Self> {
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: TrackerConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = TrackerConfig::default();
            config.save(data_directory)?;
            info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save to `config.yaml` in the data directory
    pub fn save(&self, data_directory: &Path) -> Result<()> {
        if !data_directory.exists() {
            fs::create_dir_all(data_directory).with_context(|| {
                format!("Failed to create data directory {}", data_directory.display())
            })?;
            info!("Created data directory: {:?}", data_directory);
        }

        let config_path = data_directory.join(CONFIG_FILE_NAME);
        let yaml_content = serde_yaml::to_string(self)?;

        // Use atomic write pattern: write to temp file, then rename
        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &config_path)
            .with_context(|| format!("Failed to replace {}", config_path.display()))?;

        debug!("Saved config to {:?}", config_path);
        Ok(())
    }
}

/// Default data directory: `<platform data dir>/Expense Tracker`
pub fn default_data_directory() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("Could not determine a data directory"))?;
    Ok(base.join(DEFAULT_DIRECTORY_NAME))
}

/// Resolve the data directory to use for this session
pub fn resolve_data_directory(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(directory) = explicit {
        info!("Using data directory: {}", directory.display());
        return Ok(directory);
    }

    let default_directory = default_data_directory()?;
    Ok(follow_redirect(&default_directory))
}

/// Follow a `.expense_redirect` file in `default_directory`, if present
pub fn follow_redirect(default_directory: &Path) -> PathBuf {
    let redirect_file = default_directory.join(REDIRECT_FILE_NAME);

    if !redirect_file.exists() {
        info!("Using default data directory: {}", default_directory.display());
        return default_directory.to_path_buf();
    }

    match fs::read_to_string(&redirect_file) {
        Ok(redirected_path) => {
            let redirected_path = redirected_path.trim();
            let path = PathBuf::from(redirected_path);

            if !redirected_path.is_empty() && path.is_dir() {
                info!("Found redirect file, using data directory: {}", path.display());
                path
            } else {
                warn!(
                    "Redirect file points to non-existent directory: '{}'. Using default.",
                    redirected_path
                );
                default_directory.to_path_buf()
            }
        }
        Err(e) => {
            error!("Failed to read redirect file: {}. Using default directory.", e);
            default_directory.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");

        let config = TrackerConfig::load_or_create(&data_dir).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert!(data_dir.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_config_persistence() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = TrackerConfig {
            currency_symbol: "€".to_string(),
            max_title_length: 40,
            date_format: DateFormat::Long,
            ..TrackerConfig::default()
        };
        config.save(temp_dir.path()).unwrap();

        let loaded = TrackerConfig::load_or_create(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "date_format: short\n").unwrap();

        let config = TrackerConfig::load_or_create(temp_dir.path()).unwrap();
        assert_eq!(config.date_format, DateFormat::Short);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.max_title_length, 256);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "max_title_length: [oops").unwrap();

        let result = TrackerConfig::load_or_create(temp_dir.path());
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse"));
    }

    #[test]
    fn test_explicit_directory_wins() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = resolve_data_directory(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, temp_dir.path());
    }

    #[test]
    fn test_follow_redirect() {
        let default_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();

        // No redirect file
        assert_eq!(follow_redirect(default_dir.path()), default_dir.path());

        // Redirect to an existing directory
        fs::write(
            default_dir.path().join(REDIRECT_FILE_NAME),
            format!("{}\n", target_dir.path().display()),
        )
        .unwrap();
        assert_eq!(follow_redirect(default_dir.path()), target_dir.path());

        // Redirect to a missing directory falls back to the default
        fs::write(
            default_dir.path().join(REDIRECT_FILE_NAME),
            target_dir.path().join("missing").display().to_string(),
        )
        .unwrap();
        assert_eq!(follow_redirect(default_dir.path()), default_dir.path());
    }
}
