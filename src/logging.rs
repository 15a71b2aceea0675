// ABOUTME: Logging configuration and structured logging setup for the catalog core
// ABOUTME: Configures log levels, formatters, and output destinations via tracing-subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured logging configuration built on `tracing`.

use std::env;
use std::io;

use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::errors::{AppError, AppResult};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: "garde-manger".into(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Build a configuration from environment variables
    ///
    /// `RUST_LOG` sets the level filter, `LOG_FORMAT` selects json/pretty/compact,
    /// and `ENVIRONMENT` tags the deployment environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = env::var("RUST_LOG") {
            config.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }
        if let Ok(environment) = env::var("ENVIRONMENT") {
            if environment.eq_ignore_ascii_case("production") {
                config.format = LogFormat::Json;
            }
            config.environment = environment;
        }

        config
    }

    /// Initialize the global tracing subscriber with this configuration
    ///
    /// # Errors
    /// Returns an error when the level filter cannot be parsed or a global
    /// subscriber is already installed.
    pub fn init(&self) -> AppResult<()> {
        let filter = EnvFilter::try_new(&self.level)
            .map_err(|e| AppError::validation("level", format!("invalid log filter: {e}")))?;

        let registry = tracing_subscriber::registry().with(filter);

        let init_result = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stdout)
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_current_span(true),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_writer(io::stdout)
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_writer(io::stdout))
                .try_init(),
        };

        init_result.map_err(|e| {
            AppError::internal(format!("failed to install tracing subscriber: {e}"))
        })?;

        info!(
            service = %self.service_name,
            environment = %self.environment,
            level = %self.level,
            "logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from the environment with default fallbacks
///
/// # Errors
/// Propagates [`LoggingConfig::init`] failures.
pub fn init() -> AppResult<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_location);
    }
}
