//! Configuration loading and validation shared by both envelope tools.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Prefix of every environment variable read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "ENVELOPE";

/// Log output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Validated tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing log level, overridden by `RUST_LOG` when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output encoding (`text` or `json`).
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `ENVELOPE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("{ENV_PREFIX}_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults() {
        assert_eq!(default_log_level(), "warn");
        let c = Config::from_environment(env(&[])).unwrap();
        assert_eq!(c.log_level, "warn");
        assert_eq!(c.log_format, LogFormat::Text);
    }

    #[test]
    fn reads_prefixed_variables() {
        let c = Config::from_environment(env(&[
            ("ENVELOPE_LOG_LEVEL", "debug"),
            ("ENVELOPE_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(c.log_level, "debug");
        assert_eq!(c.log_format, LogFormat::Json);
    }

    #[test]
    fn ignores_unprefixed_variables() {
        let c = Config::from_environment(env(&[("LOG_LEVEL", "trace")])).unwrap();
        assert_eq!(c.log_level, "warn");
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Config::from_environment(env(&[("ENVELOPE_LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn validate_rejects_blank_level() {
        let cfg = Config {
            log_level: "  ".into(),
            log_format: LogFormat::Text,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }
}
