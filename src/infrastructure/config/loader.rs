use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GitHub username cannot be empty")]
    EmptyUsername,

    #[error("Invalid server port: 0")]
    InvalidPort,

    #[error("Invalid cache ttl_secs: 0. Must be positive")]
    InvalidTtl,

    #[error(
        "Invalid probe interval: {0}s. Must be positive and less than ttl_secs ({1}s)"
    )]
    InvalidProbeInterval(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. gitfolio.yaml in the working directory
    /// 3. Environment variables (GITFOLIO_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("gitfolio.yaml"))
            .merge(Env::prefixed("GITFOLIO_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("GITFOLIO_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.github.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl);
        }

        if config.cache.probe_interval_secs == 0
            || config.cache.probe_interval_secs >= config.cache.ttl_secs
        {
            return Err(ConfigError::InvalidProbeInterval(
                config.cache.probe_interval_secs,
                config.cache.ttl_secs,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
