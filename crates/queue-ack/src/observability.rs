//! Logging initialisation for consumers built on this crate.

use crate::config::LoggingConfig;
use crate::error::ConfigurationError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(test)]
#[path = "observability_tests.rs"]
mod tests;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if the filter
/// directive is invalid or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigurationError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ConfigurationError::Invalid {
        message: format!("logging already initialised: {}", e),
    })
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigurationError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| ConfigurationError::Invalid {
        message: format!("logging.level '{}': {}", config.level, e),
    })
}
