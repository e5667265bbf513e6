//! TOML-based client configuration.
//!
//! Resolution order, applied once at startup: compiled defaults, then the
//! config file, then the [`API_URL_ENV`] environment variable, then the
//! `--api-url` flag. Operations only ever see the resolved value.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::api::{RequestPolicy, RetryPolicy};

/// Local-development backend address.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the backend base URL.
pub const API_URL_ENV: &str = "URJA_API_URL";

/// Top-level client configuration parsed from TOML.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Backend location.
    #[serde(default)]
    pub api: ApiConfig,
    /// Per-request limits.
    #[serde(default)]
    pub request: RequestConfig,
    /// Retry and backoff.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Terminal dashboard behaviour.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL all operation paths are appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Per-request limits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    /// Per-attempt timeout (ms). `0` disables the timeout.
    pub timeout_ms: u64,
}

/// Retry and backoff parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per operation, including the first (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry (ms).
    pub base_delay_ms: u64,
    /// Backoff multiplier (>= 1.0).
    pub factor: f64,
    /// Delay cap (ms).
    pub max_delay_ms: u64,
    /// Jitter fraction (0.0–1.0).
    pub jitter_percent: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay_ms,
            factor: policy.factor,
            max_delay_ms: policy.max_delay_ms,
            jitter_percent: policy.jitter_percent,
        }
    }
}

/// Terminal dashboard behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Automatic re-poll interval (s). `0` means manual refresh only.
    pub refresh_secs: u64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"retry.max_attempts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ClientConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Applies a base URL override if one is given and non-blank.
    ///
    /// Called with the environment variable first and the CLI flag second,
    /// so the flag wins.
    pub fn override_base_url(&mut self, url: Option<&str>) {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api.base_url = url.to_string();
        }
    }

    /// Reads [`API_URL_ENV`] and applies it as an override.
    ///
    /// This is the only place the environment is consulted.
    pub fn apply_env(&mut self) {
        let value = std::env::var(API_URL_ENV).ok();
        self.override_base_url(value.as_deref());
    }

    /// Request policy derived from the `request` and `retry` sections.
    pub fn request_policy(&self) -> RequestPolicy {
        let r = &self.retry;
        RequestPolicy {
            timeout: (self.request.timeout_ms > 0)
                .then(|| Duration::from_millis(self.request.timeout_ms)),
            retry: RetryPolicy {
                max_attempts: r.max_attempts,
                base_delay_ms: r.base_delay_ms,
                factor: r.factor,
                max_delay_ms: r.max_delay_ms,
                jitter_percent: r.jitter_percent,
            },
        }
    }

    /// Dashboard auto-refresh interval, if enabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.dashboard.refresh_secs > 0).then(|| Duration::from_secs(self.dashboard.refresh_secs))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError {
                field: "api.base_url".into(),
                message: format!("must start with http:// or https://, got \"{url}\""),
            });
        }

        let r = &self.retry;
        if r.max_attempts == 0 {
            errors.push(ConfigError {
                field: "retry.max_attempts".into(),
                message: "must be >= 1".into(),
            });
        }
        if r.factor < 1.0 {
            errors.push(ConfigError {
                field: "retry.factor".into(),
                message: "must be >= 1.0".into(),
            });
        }
        if !(0.0..=1.0).contains(&r.jitter_percent) {
            errors.push(ConfigError {
                field: "retry.jitter_percent".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if r.base_delay_ms > r.max_delay_ms {
            errors.push(ConfigError {
                field: "retry.base_delay_ms".into(),
                message: "must be <= retry.max_delay_ms".into(),
            });
        }

        errors
    }
}
