//! Client configuration for the RapidAPI backend.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

/// Production endpoint of the plate lookup API.
pub const DEFAULT_BASE_URL: &str = "https://cek-nopol-kendaraan.p.rapidapi.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

const ENV_API_KEY: &str = "TNKB_API_KEY";
const ENV_BASE_URL: &str = "TNKB_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "TNKB_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "TNKB_MAX_RETRIES";
const ENV_VERIFY_SSL: &str = "TNKB_VERIFY_SSL";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Errors raised while reading configuration from the environment.
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
    /// The base URL cannot be used to reach the lookup endpoint.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidUrl {
        /// Configured base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// HTTP method used for the lookup call.
pub enum RequestMethod {
    /// `GET /check?nopol=...`
    #[default]
    Get,
    /// `POST /check` with a JSON body.
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings for [`crate::RapidApiLookupPort`].
pub struct RapidApiConfig {
    /// Base URL without the `/check` path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt on transient failures.
    pub max_retries: u32,
    /// Base delay of the exponential backoff.
    pub backoff: Duration,
    /// Whether TLS certificates are verified.
    pub verify_ssl: bool,
    /// RapidAPI key sent as `X-RapidAPI-Key`.
    pub api_key: Option<String>,
    /// HTTP method of the lookup call.
    pub method: RequestMethod,
}

impl Default for RapidApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
            verify_ssl: true,
            api_key: None,
            method: RequestMethod::Get,
        }
    }
}

impl RapidApiConfig {
    /// Defaults overridden by `TNKB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric or boolean variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric or boolean value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
            config.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32>(&lookup, ENV_MAX_RETRIES)? {
            config.max_retries = retries;
        }
        if let Some(verify) = parse_var::<bool>(&lookup, ENV_VERIFY_SSL)? {
            config.verify_ssl = verify;
        }

        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries after the first attempt.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff delay.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the HTTP method of the lookup call.
    #[must_use]
    pub fn with_method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    /// Full URL of the lookup endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the base URL cannot be parsed
    /// or has no host.
    pub fn check_url(&self) -> Result<Url, ConfigError> {
        self.base()?
            .join("check")
            .map_err(|err| self.invalid_url(err.to_string()))
    }

    /// Host and explicit port of the base URL, sent as `X-RapidAPI-Host`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the base URL cannot be parsed
    /// or has no host.
    pub fn host(&self) -> Result<String, ConfigError> {
        let base = self.base()?;
        let host = base
            .host_str()
            .ok_or_else(|| self.invalid_url("missing host".to_owned()))?;
        Ok(match base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        })
    }

    /// Base URL as a directory, so `join` appends instead of replacing the last segment.
    fn base(&self) -> Result<Url, ConfigError> {
        let mut url =
            Url::parse(self.base_url.trim()).map_err(|err| self.invalid_url(err.to_string()))?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(self.invalid_url("missing host".to_owned()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn invalid_url(&self, reason: String) -> ConfigError {
        ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(ConfigError::InvalidValue {
            key,
            value: raw.clone(),
        }),
    }
}
