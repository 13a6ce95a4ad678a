//! # File Key-Value Store
//!
//! This module provides a file-based key-value storage implementation where
//! every key maps to a single JSON file in the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── config.yaml           ← managed by the config module
//! ├── Expenses.json         ← value stored under the "Expenses" key
//! └── Expenses.corrupt.json ← backup of an unreadable list, if one was found
//! ```
//!
//! Writes use the atomic pattern: write to a temp file, then rename over the
//! target, so a crash never leaves a half-written value behind.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::{validate_key, KeyValueStorage};

const VALUE_FILE_EXTENSION: &str = "json";

/// File-backed key-value store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_directory: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new store, creating the base directory if it doesn't exist
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            debug!("Created data directory {:?}", base_path);
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file path backing a key
    pub fn value_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self
            .base_directory
            .join(format!("{}.{}", key, VALUE_FILE_EXTENSION)))
    }
}

impl KeyValueStorage for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        if !path.exists() {
            debug!("No value stored for key '{}'", key);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        debug!("Read {} bytes for key '{}' from {:?}", content.len(), key, path);
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;

        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory).with_context(|| {
                format!(
                    "Failed to create data directory {}",
                    self.base_directory.display()
                )
            })?;
        }

        let temp_path = self
            .base_directory
            .join(format!("{}.{}.tmp", key, VALUE_FILE_EXTENSION));
        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} bytes for key '{}' to {:?}", value.len(), key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.value_path(key)?;
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!("Removed key '{}'", key);
        Ok(true)
    }

    fn backup(&self, key: &str, backup_key: &str) -> Result<bool> {
        let path = self.value_path(key)?;
        let backup_path = self.value_path(backup_key)?;
        if !path.exists() {
            return Ok(false);
        }

        // Byte copy, so files that are not valid UTF-8 are kept as they are
        fs::copy(&path, &backup_path).with_context(|| {
            format!("Failed to copy {} to {}", path.display(), backup_path.display())
        })?;
        debug!("Backed up key '{}' to '{}'", key, backup_key);
        Ok(true)
    }
}
