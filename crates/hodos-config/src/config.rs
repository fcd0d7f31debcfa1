//! The top-level configuration.

use crate::{ConfigError, LogFormat, LoggingConfig, MetricsSection, RouterConfig};
use serde::{Deserialize, Serialize};

/// Complete Hodos configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// ```
/// use hodos_config::HodosConfig;
///
/// let config = HodosConfig::default();
/// assert!(config.router.handle_method_failure);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HodosConfig {
    /// Routing configuration.
    #[serde(default)]
    pub router: RouterConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl HodosConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the log level is empty or a
    /// resource path is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty when logging is enabled",
            ));
        }

        if let Some(index) = self
            .router
            .resources
            .iter()
            .position(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::invalid_value(
                format!("router.resources[{index}]"),
                "path must not be empty",
            ));
        }

        Ok(())
    }

    /// Pretty debug-level logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    /// JSON info-level logging.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}
