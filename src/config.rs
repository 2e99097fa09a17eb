//! Cache configuration: typed settings with layered precedence (file → env).

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

const LOCAL_CONFIG_BASENAME: &str = "foglio";
const ENV_PREFIX: &str = "FOGLIO";

const DEFAULT_TTL_SECS: u64 = 600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 120;
const DEFAULT_EVENT_QUEUE_LIMIT: usize = 1024;
const DEFAULT_CONSUME_BATCH_LIMIT: usize = 100;

/// Cache configuration from `foglio.toml` and `FOGLIO_*` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; when false, triggers become no-ops and read paths
    /// should bypass the store entirely.
    pub enabled: bool,
    /// TTL applied by `Store::set` when no explicit TTL is given.
    pub default_ttl_secs: u64,
    /// Cadence of the background expired-entry sweep.
    pub sweep_interval_secs: u64,
    /// Maximum pending invalidation events before the oldest is dropped.
    pub event_queue_limit: usize,
    /// Maximum events consumed per invalidation batch.
    pub consume_batch_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            event_queue_limit: DEFAULT_EVENT_QUEUE_LIMIT,
            consume_batch_limit: DEFAULT_CONSUME_BATCH_LIMIT,
        }
    }
}

/// Failure while loading or validating the cache configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

impl CacheConfig {
    /// Load settings using the configured precedence (file → environment).
    pub fn load() -> Result<Self, LoadError> {
        Self::load_from(None)
    }

    /// Load settings, additionally requiring the given configuration file.
    pub fn load_from(path: Option<&Path>) -> Result<Self, LoadError> {
        let mut builder =
            Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.default_ttl_secs == 0 {
            return Err(LoadError::Invalid {
                key: "default_ttl_secs",
                reason: "must be greater than zero",
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(LoadError::Invalid {
                key: "sweep_interval_secs",
                reason: "must be greater than zero",
            });
        }
        if self.consume_batch_limit == 0 {
            return Err(LoadError::Invalid {
                key: "consume_batch_limit",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Default entry TTL as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Background sweep cadence as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.default_ttl_secs, 600);
        assert_eq!(config.sweep_interval_secs, 120);
        assert_eq!(config.event_queue_limit, 1024);
        assert_eq!(config.consume_batch_limit, 100);
    }

    #[test]
    fn duration_helpers() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl(), Duration::from_secs(600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(120));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let config = CacheConfig {
            default_ttl_secs: 0,
            ..Default::default()
        };
        let err = config.validate().expect_err("zero ttl should be invalid");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "default_ttl_secs",
                ..
            }
        ));
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let config = CacheConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_batch_limit_is_rejected() {
        let config = CacheConfig {
            consume_batch_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp config file should be created");
        writeln!(
            file,
            "default_ttl_secs = 30\nsweep_interval_secs = 5\nenabled = false"
        )
        .expect("temp config file should be writable");

        let config =
            CacheConfig::load_from(Some(file.path())).expect("config file should deserialize");
        assert!(!config.enabled);
        assert_eq!(config.default_ttl_secs, 30);
        assert_eq!(config.sweep_interval_secs, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.consume_batch_limit, 100);
    }

    #[test]
    fn invalid_file_values_are_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp config file should be created");
        writeln!(file, "default_ttl_secs = 0").expect("temp config file should be writable");

        assert!(CacheConfig::load_from(Some(file.path())).is_err());
    }
}
