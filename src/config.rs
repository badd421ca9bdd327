use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(900);
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("{field} is not a valid duration in seconds: {value}")]
    InvalidDuration { field: &'static str, value: f64 },
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Expiry settings for a [`TtlCache`](crate::TtlCache).
///
/// Both durations are guaranteed non-zero. The JSON form is
/// `{"ttl_secs": 900, "cleanup_interval_secs": 60}`; either field may be
/// omitted and fractional seconds are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct CacheConfig {
    ttl: Duration,
    cleanup_interval: Duration,
}

impl CacheConfig {
    pub fn new(ttl: Duration, cleanup_interval: Duration) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::ZeroDuration("ttl"));
        }
        if cleanup_interval.is_zero() {
            return Err(ConfigError::ZeroDuration("cleanup_interval"));
        }
        Ok(Self {
            ttl,
            cleanup_interval,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    pub fn with_ttl(self, ttl: Duration) -> Result<Self, ConfigError> {
        Self::new(ttl, self.cleanup_interval)
    }

    pub fn with_cleanup_interval(self, cleanup_interval: Duration) -> Result<Self, ConfigError> {
        Self::new(self.ttl, cleanup_interval)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading cache config from {:?}", path);
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

pub fn secs_to_duration(field: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDuration { field, value: secs })
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_ttl_secs")]
    ttl_secs: f64,
    #[serde(default = "default_cleanup_interval_secs")]
    cleanup_interval_secs: f64,
}

fn default_ttl_secs() -> f64 {
    DEFAULT_TTL.as_secs_f64()
}

fn default_cleanup_interval_secs() -> f64 {
    DEFAULT_CLEANUP_INTERVAL.as_secs_f64()
}

impl TryFrom<RawConfig> for CacheConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        CacheConfig::new(
            secs_to_duration("ttl_secs", raw.ttl_secs)?,
            secs_to_duration("cleanup_interval_secs", raw.cleanup_interval_secs)?,
        )
    }
}

impl From<CacheConfig> for RawConfig {
    fn from(config: CacheConfig) -> Self {
        RawConfig {
            ttl_secs: config.ttl.as_secs_f64(),
            cleanup_interval_secs: config.cleanup_interval.as_secs_f64(),
        }
    }
}
