//! # Configuration Management
//!
//! Key/value configuration for the interception CA tooling. Values are layered
//! with the `config` crate: built-in defaults, an optional TOML file,
//! `INTERCEPT_CA_*` environment variables, and finally explicit overrides
//! (typically CLI flags).

pub mod settings;

use std::path::{Path, PathBuf};

use crate::{Error, Result, APP_NAME};

pub use settings::ObservabilityConfig;

/// Base directory for per-version caches and the temporary directory
pub const CACHE_PATH: &str = "cache_path";

/// Validity window of a generated CA, in hours
pub const CA_VALIDITY_HOURS: &str = "ca_validity_hours";

/// Log level (trace, debug, info, warn, error)
pub const LOG_LEVEL: &str = "log_level";

/// Emit JSON formatted log lines
pub const JSON_LOGGING: &str = "json_logging";

/// Environment variable prefix (`INTERCEPT_CA_CACHE_PATH`, ...)
pub const ENV_PREFIX: &str = "INTERCEPT_CA";

const DEFAULT_CA_VALIDITY_HOURS: i64 = 24;

/// Read-only configuration accessor handed to workflows and the CA generator.
#[derive(Debug, Clone)]
pub struct Configuration {
    inner: config::Config,
}

impl Configuration {
    /// Load defaults, the optional file, the environment, then `overrides`.
    pub fn load<I, K, V>(file: Option<&Path>, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = Self::defaults()?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        for (key, value) in overrides {
            builder = builder.set_override(key.as_ref(), value.into())?;
        }

        Ok(Self { inner: builder.build()? })
    }

    /// Defaults plus `overrides`, ignoring files and the environment.
    pub fn from_overrides<I, K, V>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = Self::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(key.as_ref(), value.into())?;
        }
        Ok(Self { inner: builder.build()? })
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let default_cache = std::env::temp_dir().join(APP_NAME);

        Ok(config::Config::builder()
            .set_default(CACHE_PATH, default_cache.to_string_lossy().into_owned())?
            .set_default(CA_VALIDITY_HOURS, DEFAULT_CA_VALIDITY_HOURS)?
            .set_default(LOG_LEVEL, "info")?
            .set_default(JSON_LOGGING, false)?)
    }

    /// String value for `key`, `None` when unset.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.inner.get_string(key).ok()
    }

    /// Boolean value for `key`, `None` when unset or not a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.inner.get_bool(key).ok()
    }

    /// Integer value for `key`; a present but malformed value is an error.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.inner.get_int(key) {
            Ok(value) => Ok(Some(value)),
            Err(config::ConfigError::NotFound(_)) => Ok(None),
            Err(e) => Err(Error::config(format!("Invalid value for {}: {}", key, e))),
        }
    }

    /// Cache base directory (`cache_path`)
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(self.get_string(CACHE_PATH).unwrap_or_default())
    }

    /// Validity window for generated CA certificates
    pub fn ca_validity(&self) -> Result<time::Duration> {
        let hours = self.get_i64(CA_VALIDITY_HOURS)?.unwrap_or(DEFAULT_CA_VALIDITY_HOURS);
        if hours <= 0 {
            return Err(Error::config(format!(
                "{} must be positive, got {}",
                CA_VALIDITY_HOURS, hours
            )));
        }
        Ok(time::Duration::hours(hours))
    }
}
