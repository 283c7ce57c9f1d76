//! Client configuration.
//!
//! Everything that used to be a module-level constant (the service address)
//! is a field of [`ClientConfig`], so tests can point a client at a mock
//! server and several environments can coexist in one process.
//!
//! Built via [`ClientConfig::builder()`], [`ClientConfig::default()`] or
//! [`ClientConfig::from_env()`].

use crate::error::ConfigError;
use std::time::Duration;

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Default base64 decode window, in bytes.
pub const DEFAULT_DECODE_WINDOW: usize = 512;

/// Filename sent when the caller leaves it blank.
pub const DEFAULT_FILENAME: &str = "output";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "DOCTEXT_BASE_URL";

/// Environment variable overriding [`ClientConfig::timeout_secs`].
pub const ENV_TIMEOUT: &str = "DOCTEXT_TIMEOUT";

/// Configuration shared by the extraction and conversion clients.
///
/// # Example
/// ```rust
/// use doctext::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://ocr.internal:5000/api")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint("convert"), "http://ocr.internal:5000/api/convert");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL without a trailing slash. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: 120.
    ///
    /// Extraction of a scanned multi-page document can take a while on the
    /// server side; a timeout surfaces as a transport error like any other
    /// network failure.
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// Window size used when assembling decoded file data. Default: 512.
    pub decode_window: usize,

    /// Filename substituted for a blank one in conversion requests. Default: `"output"`.
    pub default_filename: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
            connect_timeout_secs: 10,
            decode_window: DEFAULT_DECODE_WINDOW,
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults overridden by `DOCTEXT_BASE_URL` and `DOCTEXT_TIMEOUT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                builder = builder.base_url(url);
            }
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"))
            })?;
            builder = builder.timeout_secs(secs);
        }
        builder.build()
    }

    /// Full URL of an endpoint below the base path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn decode_window(mut self, bytes: usize) -> Self {
        self.config.decode_window = bytes.max(1);
        self
    }

    pub fn default_filename(mut self, name: impl Into<String>) -> Self {
        self.config.default_filename = name.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let c = &self.config;

        let url = reqwest::Url::parse(&c.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: c.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url: c.base_url.clone(),
                reason: format!("scheme must be http or https, got '{}'", url.scheme()),
            });
        }
        if c.timeout_secs == 0 {
            return Err(ConfigError::Invalid("Timeout must be ≥ 1 second".into()));
        }
        if c.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "Connect timeout must be ≥ 1 second".into(),
            ));
        }
        if c.default_filename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Default filename must not be blank".into(),
            ));
        }
        Ok(self.config)
    }
}
