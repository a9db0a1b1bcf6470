//! Configuration for queue consumers.
//!
//! Sources are applied in order, later sources overriding earlier ones:
//!  1. `config/queue-ack.{toml,yaml}`  - deployment-local defaults (optional)
//!  2. An explicit file path            - operator-specified file (required if given)
//!  3. Environment variables prefixed `QUEUE_ACK__` with `__` as the separator,
//!     e.g. `QUEUE_ACK__SQS__REGION=eu-west-1` sets `sqs.region`
//!
//! Every field carries a serde default, so an unconfigured environment still
//! produces a valid configuration.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

const ENV_PREFIX: &str = "QUEUE_ACK";
const LOCAL_CONFIG_FILE: &str = "config/queue-ack";

/// Consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsumerConfig {
    /// SQS client settings
    pub sqs: SqsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsumerConfig {
    /// Load configuration from the layered sources, then validate it
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(LOCAL_CONFIG_FILE).required(false));

        if let Some(path) = explicit_path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigurationError::Parsing {
                message: e.to_string(),
            })?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check that all settings are usable
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.sqs.validate()?;
        self.logging.validate()
    }
}

/// AWS SQS client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqsConfig {
    /// AWS region
    pub region: String,

    /// Endpoint override, e.g. for a local SQS emulator
    pub endpoint_url: Option<String>,
}

impl Default for SqsConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
        }
    }
}

impl SqsConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.region.trim().is_empty() {
            return Err(ConfigurationError::Missing {
                key: "sqs.region".to_string(),
            });
        }

        if let Some(endpoint) = &self.endpoint_url {
            url::Url::parse(endpoint).map_err(|e| ConfigurationError::Invalid {
                message: format!("sqs.endpoint_url '{}': {}", endpoint, e),
            })?;
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level or filter directive
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.level.trim().is_empty() {
            return Err(ConfigurationError::Missing {
                key: "logging.level".to_string(),
            });
        }

        Ok(())
    }
}
