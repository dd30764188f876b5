use std::{str::FromStr, time::Duration};

use config::{Config, ConfigError, File};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

use crate::models::BoundingBox;

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub environment: Environment,
    pub log_level: String,
    pub api_address: String,
    pub api_key: ApiKey,
    pub bounding_box: BoundingBox,
    pub message_types: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub staleness_threshold: Duration,
    #[serde(with = "humantime_serde")]
    pub eviction_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub stats_interval: Duration,
    /// The connection is dropped and re-established if no frame arrives within this window.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
    pub reconnect: ReconnectSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReconnectSettings {
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

/// The aisstream.io access key, kept out of debug output.
#[derive(Deserialize, Clone)]
#[serde(transparent)]
pub struct ApiKey(String);

impl Settings {
    pub fn new() -> Result<Settings, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
        let environment = Environment::from_str(&environment).map_err(|e| {
            ConfigError::Message(format!("invalid APP_ENVIRONMENT '{environment}': {e}"))
        })?;

        let settings: Settings = Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_ref().to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("AIS_CONSUMER").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.0.trim().is_empty() {
            return Err(ConfigError::Message("api_key must not be empty".into()));
        }
        if self.reconnect.base_delay.is_zero() || self.reconnect.max_delay < self.reconnect.base_delay
        {
            return Err(ConfigError::Message(
                "reconnect.base_delay must be non-zero and not exceed reconnect.max_delay".into(),
            ));
        }
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::Message("idle_timeout must be non-zero".into()));
        }
        Ok(())
    }
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> ApiKey {
        ApiKey(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
