use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, StoreBackend};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid selector_concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("The memory evidence store requires evidence_store.fragments_path")]
    MissingFragmentsPath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .themis/config.yaml (project config)
    /// 3. .themis/local.yaml (project local overrides, optional)
    /// 4. Environment variables (THEMIS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".themis/config.yaml"))
            .merge(Yaml::file(".themis/local.yaml"))
            .merge(Env::prefixed("THEMIS_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// The file replaces the project config files; environment variables
    /// still override it.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("THEMIS_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the project hierarchy
    pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Agent loop
        if config.agent.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.agent.top_k));
        }

        if config.agent.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(config.agent.max_iterations));
        }

        if config.agent.selector_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                config.agent.selector_concurrency,
            ));
        }

        // Oracle
        let oracle = &config.oracle;
        if oracle.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyField("oracle.base_url"));
        }

        if oracle.model.trim().is_empty() {
            return Err(ConfigError::EmptyField("oracle.model"));
        }

        for temperature in [oracle.temperature, oracle.classification_temperature] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidTemperature(temperature));
            }
        }

        if oracle.requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(oracle.requests_per_second));
        }

        // Evidence store
        let store = &config.evidence_store;
        match store.backend {
            StoreBackend::Chroma => {
                if store.base_url.trim().is_empty() {
                    return Err(ConfigError::EmptyField("evidence_store.base_url"));
                }
                if store.collection.trim().is_empty() {
                    return Err(ConfigError::EmptyField("evidence_store.collection"));
                }
                if store.embedding_url.trim().is_empty() {
                    return Err(ConfigError::EmptyField("evidence_store.embedding_url"));
                }
                if store.embedding_model.trim().is_empty() {
                    return Err(ConfigError::EmptyField("evidence_store.embedding_model"));
                }
            }
            StoreBackend::Memory => {
                if store.fragments_path.is_none() {
                    return Err(ConfigError::MissingFragmentsPath);
                }
            }
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
