// ABOUTME: Engine configuration with environment-first loading and validated defaults
// ABOUTME: Covers pagination bounds, sort defaults, and the rating write retry budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-only configuration for the catalog engines.
//!
//! Every knob has a safe default; `GARDE_MANGER_*` environment variables
//! override them at startup. No configuration files are read.

use crate::errors::{AppError, AppResult};
use std::env;

/// Default number of results per page when the caller omits `page_size`
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard upper bound on `page_size`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default attempts for the rating aggregator's read-recompute-write cycle
pub const DEFAULT_RATING_WRITE_RETRIES: u32 = 3;

/// Runtime configuration for the catalog engines
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Page size applied when a query omits one
    pub default_page_size: u32,
    /// Largest page size a query may request
    pub max_page_size: u32,
    /// How many times the rating aggregator retries a conflicted write
    pub rating_write_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            rating_write_retries: DEFAULT_RATING_WRITE_RETRIES,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// # Errors
    /// Returns a validation error when an override is present but not a
    /// positive integer, or when `default_page_size` exceeds `max_page_size`.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(value) = read_env_u32("GARDE_MANGER_DEFAULT_PAGE_SIZE")? {
            config.default_page_size = value;
        }
        if let Some(value) = read_env_u32("GARDE_MANGER_MAX_PAGE_SIZE")? {
            config.max_page_size = value;
        }
        if let Some(value) = read_env_u32("GARDE_MANGER_RATING_WRITE_RETRIES")? {
            config.rating_write_retries = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the configuration
    ///
    /// # Errors
    /// Returns a validation error for zero page sizes, a zero retry budget,
    /// or a default page size larger than the maximum.
    pub fn validate(&self) -> AppResult<()> {
        if self.default_page_size == 0 {
            return Err(AppError::validation(
                "default_page_size",
                "must be at least 1",
            ));
        }
        if self.max_page_size == 0 {
            return Err(AppError::validation("max_page_size", "must be at least 1"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(AppError::validation(
                "default_page_size",
                format!(
                    "must not exceed max_page_size ({})",
                    self.max_page_size
                ),
            ));
        }
        if self.rating_write_retries == 0 {
            return Err(AppError::validation(
                "rating_write_retries",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Read an optional `u32` environment variable, reporting parse failures
fn read_env_u32(name: &str) -> AppResult<Option<u32>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| AppError::validation(name, format!("not a valid integer: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_default_exceeding_max_rejected() {
        let config = EngineConfig {
            default_page_size: 200,
            max_page_size: 100,
            rating_write_retries: 3,
        };
        let err = config.validate().err();
        assert!(err.is_some());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let config = EngineConfig {
            rating_write_retries: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
