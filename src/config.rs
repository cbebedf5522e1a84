//! Configuration types for sample-sweep

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metadata manager (Sonarr) connection settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SonarrConfig {
    /// Versioned REST base URL, e.g. `http://localhost:8989/api/v3`
    pub base_url: String,

    /// API key sent as the `X-Api-Key` header on every request
    pub api_key: String,
}

/// Download client (NZBGet) connection settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NzbgetConfig {
    /// JSON-RPC endpoint URL, e.g. `http://localhost:6789/jsonrpc`
    pub url: String,

    /// Basic-auth username
    pub username: String,

    /// Basic-auth password
    pub password: String,
}

/// Retry policy for an operation with a fixed delay between attempts
///
/// Deliberately plain: the one retried operation here (queue-entry deletion)
/// calls an idempotent local service, so fixed spacing without backoff or
/// jitter is sufficient.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, counting the first one (default: 3)
    #[serde(default = "default_queue_delete_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (default: 2 seconds)
    #[serde(default = "default_queue_delete_delay", with = "duration_serde")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_queue_delete_attempts(),
            delay: default_queue_delete_delay(),
        }
    }
}

/// Sweep behavior settings (retry policy, cooldown, HTTP timeout)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Retry policy for removing an entry from the metadata manager's queue
    #[serde(default)]
    pub queue_delete: RetryConfig,

    /// How long to wait after the pass before re-fetching the queue to verify
    /// remediation (default: 10 seconds)
    #[serde(default = "default_verify_cooldown", with = "duration_serde")]
    pub verify_cooldown: Duration,

    /// Request timeout for both HTTP clients (default: 30 seconds)
    #[serde(default = "default_http_timeout", with = "duration_serde")]
    pub http_timeout: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            queue_delete: RetryConfig::default(),
            verify_cooldown: default_verify_cooldown(),
            http_timeout: default_http_timeout(),
        }
    }
}

/// Main configuration for a sweep
///
/// Supplied by the embedding application, either deserialized from a config
/// file or assembled from the environment via [`Config::from_env`]. Connection
/// settings are injected into the adapters at construction; nothing reads
/// them from globals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Metadata manager connection settings
    pub sonarr: SonarrConfig,

    /// Download client connection settings
    pub nzbget: NzbgetConfig,

    /// Sweep behavior settings
    #[serde(flatten)]
    pub sweep: SweepConfig,
}

impl Config {
    /// Assemble a configuration from environment variables
    ///
    /// Reads `SONARR_URL`, `SONARR_API_KEY`, `NZBGET_URL`, `NZBGET_USERNAME`
    /// and `NZBGET_PASSWORD`; sweep behavior keeps its defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            sonarr: SonarrConfig {
                base_url: required_env("SONARR_URL")?,
                api_key: required_env("SONARR_API_KEY")?,
            },
            nzbget: NzbgetConfig {
                url: required_env("NZBGET_URL")?,
                username: required_env("NZBGET_USERNAME")?,
                password: required_env("NZBGET_PASSWORD")?,
            },
            sweep: SweepConfig::default(),
        })
    }
}

fn required_env(key: &'static str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| Error::config(format!("missing required environment variable {key}"), key))
}

fn default_queue_delete_attempts() -> u32 {
    3
}

fn default_queue_delete_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_verify_cooldown() -> Duration {
    Duration::from_secs(10)
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
