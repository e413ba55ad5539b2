use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::models::LoggingConfig;

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format for the console layer
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stderr)
    pub log_dir: Option<PathBuf>,

    /// Log rotation policy
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl FromStr for RotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown rotation policy: {other}")),
        }
    }
}

impl TryFrom<&LoggingConfig> for LogConfig {
    type Error = String;

    fn try_from(config: &LoggingConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            level: config.level.clone(),
            format: config.format.parse()?,
            log_dir: config.log_dir.clone(),
            rotation: config.rotation.parse()?,
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logging_config() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "JSON".to_string(),
            log_dir: Some(PathBuf::from("/tmp/themis-logs")),
            rotation: "hourly".to_string(),
        };

        let resolved = LogConfig::try_from(&config).unwrap();

        assert_eq!(resolved.level, "debug");
        assert_eq!(resolved.format, LogFormat::Json);
        assert_eq!(resolved.rotation, RotationPolicy::Hourly);
        assert_eq!(resolved.log_dir, Some(PathBuf::from("/tmp/themis-logs")));
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!("xml".parse::<LogFormat>().is_err());
        assert!("weekly".parse::<RotationPolicy>().is_err());
    }
}
