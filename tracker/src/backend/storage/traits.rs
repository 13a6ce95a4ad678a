//! # Storage Traits
//!
//! This module defines the key-value storage abstraction that lets the domain
//! layer persist its data without knowing where the bytes end up.

use anyhow::{anyhow, Result};

/// Trait defining the interface for key-value storage operations
///
/// Values are opaque text blobs addressed by string keys. Implementations are
/// synchronous: every call completes before returning.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`
    /// Returns true if a value was found and deleted, false otherwise
    fn remove(&self, key: &str) -> Result<bool>;

    /// Copy whatever is stored under `key` to `backup_key`, even when it
    /// cannot be read back as text
    /// Returns true if there was a value to copy, false otherwise
    fn backup(&self, key: &str, backup_key: &str) -> Result<bool> {
        match self.get(key)? {
            Some(value) => {
                self.set(backup_key, &value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Check that a key is safe to use as a file name on every platform
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(anyhow!("Storage key cannot be empty"));
    }
    if key.starts_with('.') {
        return Err(anyhow!("Storage key '{}' cannot start with '.'", key));
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(anyhow!("Storage key '{}' contains invalid character '{}'", key, c));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_simple_keys() {
        assert!(validate_key("Expenses").is_ok());
        assert!(validate_key("Expenses.corrupt").is_ok());
        assert!(validate_key("user_settings-v2").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_unsafe_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("..").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a b").is_err());

        let err = validate_key("sub\\dir").unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }
}
