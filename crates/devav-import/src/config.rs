//! Migration configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! yield_interval = 256
//! clone_factor = 10
//! clone_date_shift_days = -1
//! ```

use crate::error::MigrationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs of one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Records an import task processes between cooperative yields
    pub yield_interval: usize,
    /// Clones produced per parent aggregate
    pub clone_factor: usize,
    /// Day offset applied to the date of every cloned parent
    pub clone_date_shift_days: i64,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            yield_interval: 256,
            clone_factor: 10,
            clone_date_shift_days: -1,
        }
    }
}

impl MigrationConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With yield interval
    #[inline]
    #[must_use]
    pub fn with_yield_interval(mut self, interval: usize) -> Self {
        self.yield_interval = interval;
        self
    }

    /// With clone factor
    #[inline]
    #[must_use]
    pub fn with_clone_factor(mut self, factor: usize) -> Self {
        self.clone_factor = factor;
        self
    }

    /// With clone date shift
    #[inline]
    #[must_use]
    pub fn with_clone_date_shift_days(mut self, days: i64) -> Self {
        self.clone_date_shift_days = days;
        self
    }

    /// Check invariants
    ///
    /// # Errors
    /// [`MigrationError::Config`] when `yield_interval` is zero
    pub fn validate(&self) -> Result<(), MigrationError> {
        if self.yield_interval == 0 {
            return Err(MigrationError::Config(
                "yield_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// [`MigrationError::Config`] on malformed TOML, unknown keys or
    /// invalid values
    pub fn from_toml_str(text: &str) -> Result<Self, MigrationError> {
        let config: Self =
            toml::from_str(text).map_err(|e| MigrationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`MigrationError::Config`] when the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MigrationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MigrationError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
