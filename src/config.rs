use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const ENV_PREFIX: &str = "PLANT_HEALTH";

/// What `submit_image` does when an analysis is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Refuse the new image and report busy; the running analysis continues.
    #[default]
    Reject,
    /// Start over with the new image; the running analysis' result is discarded.
    Supersede,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub simulated_latency_ms: u64,
    pub provider_timeout_ms: Option<u64>,
    pub busy_policy: BusyPolicy,
    pub display_scheme: String,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 2000,
            provider_timeout_ms: None,
            busy_policy: BusyPolicy::Reject,
            display_scheme: "blob:plant-health".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Defaults, then the optional file, then `PLANT_HEALTH_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let configuration: Configuration = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.map(Duration::from_millis)
    }

    pub fn level(&self) -> Result<Level, AppError> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| AppError::Config(format!("Unknown log level '{}'", self.log_level)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.display_scheme.trim().is_empty() {
            return Err(AppError::Config(
                "Display scheme must not be empty".to_string(),
            ));
        }

        if self.provider_timeout_ms == Some(0) {
            return Err(AppError::Config(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        self.level()?;
        Ok(())
    }
}
