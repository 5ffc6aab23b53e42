//! Plate lookup provider backed by the RapidAPI `cek-nopol-kendaraan` service.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, Error as ReqwestError, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use tnkb_core::{
    ports::{ApiError, LookupPayload, PlateLookupPort},
    registry::RegionRegistry,
    service::TnkbService,
};

/// Client configuration and environment overrides.
pub mod config;
/// Retry policy with exponential backoff.
pub mod retry;

pub use config::{ConfigError, RapidApiConfig, RequestMethod};
pub use retry::RetryPolicy;

const USER_AGENT: &str = concat!("tnkb/", env!("CARGO_PKG_VERSION"));
const HOST_HEADER: &str = "x-rapidapi-host";
const KEY_HEADER: &str = "x-rapidapi-key";

#[derive(thiserror::Error, Debug)]
/// Errors that prevent the provider from being constructed.
pub enum BuildError {
    /// A configured value cannot be sent as an HTTP header.
    #[error("Invalid value for header {name}: {source}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Underlying error.
        source: InvalidHeaderValue,
    },
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ReqwestError),
    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Response envelope from /check
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Plate lookup implementation for the RapidAPI backend.
///
/// Owns a single HTTP client whose connection pool is reused by every request
/// and released when the port is dropped.
pub struct RapidApiLookupPort {
    client: Client,
    endpoint: Url,
    config: RapidApiConfig,
    retry: RetryPolicy,
}

impl RapidApiLookupPort {
    /// Create a new port with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when the base URL is unusable, the host or API
    /// key are not valid header values, or the HTTP client cannot be initialised.
    pub fn new(config: RapidApiConfig) -> Result<Self, BuildError> {
        let endpoint = config.check_url()?;
        let host = config.host()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HOST_HEADER, header_value(HOST_HEADER, &host)?);
        if let Some(key) = config.api_key.as_deref() {
            let mut value = header_value(KEY_HEADER, key)?;
            value.set_sensitive(true);
            headers.insert(KEY_HEADER, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        let retry = RetryPolicy {
            max_retries: config.max_retries,
            backoff: config.backoff,
        };

        Ok(Self {
            client,
            endpoint,
            config,
            retry,
        })
    }

    /// Configuration the port was built with.
    #[must_use]
    pub fn config(&self) -> &RapidApiConfig {
        &self.config
    }

    async fn request(&self, plate: &str) -> Result<LookupPayload, ApiError> {
        let url = self.endpoint.clone();
        let req = match self.config.method {
            RequestMethod::Get => self.client.get(url).query(&[("nopol", plate)]),
            RequestMethod::Post => self.client.post(url).json(&json!({ "nopol": plate })),
        };

        debug!("{:?} {} nopol={plate}", self.config.method, self.endpoint);

        let resp = req.send().await.map_err(|err| self.classify(err))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|err| self.classify(err))?;
        parse_envelope(&body)
    }

    fn classify(&self, err: ReqwestError) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                timeout: self.config.timeout,
            }
        } else if err.is_connect() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

#[async_trait]
impl PlateLookupPort for RapidApiLookupPort {
    fn name(&self) -> &str {
        "rapidapi"
    }

    async fn lookup(&self, plate: &str) -> Result<LookupPayload, ApiError> {
        retry::with_retry(self.retry, move || self.request(plate)).await
    }
}

/// Build a service that looks plates up through RapidAPI and falls back to
/// the built-in region registry.
///
/// # Errors
///
/// Returns a [`BuildError`] when the port cannot be constructed.
pub fn service(config: RapidApiConfig) -> Result<TnkbService, BuildError> {
    let port = Arc::new(RapidApiLookupPort::new(config)?);
    Ok(TnkbService::new(Arc::new(RegionRegistry::builtin()), port))
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, BuildError> {
    HeaderValue::from_str(value).map_err(|source| BuildError::InvalidHeader { name, source })
}

/// Decode the `/check` response body into a validated payload.
fn parse_envelope(body: &[u8]) -> Result<LookupPayload, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| ApiError::Malformed(err.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Malformed("response body is not a JSON object".to_owned()));
    }

    let envelope =
        Envelope::deserialize(&value).map_err(|err| ApiError::Malformed(err.to_string()))?;

    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "Unknown error".to_owned()),
        ));
    }

    // Some responses put the fields at the top level instead of under `data`.
    match envelope.data {
        Some(data) => LookupPayload::try_from(data),
        None => LookupPayload::try_from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data_object() {
        let payload = parse_envelope(
            br#"{"success": true, "data": {"region_code": "B", "vehicle_type": "Car", "color": "Black"}}"#,
        )
        .expect("valid envelope");

        assert_eq!(payload.region_code.as_deref(), Some("B"));
        assert_eq!(payload.vehicle_type.as_deref(), Some("Car"));
        assert_eq!(payload.raw.get("color"), Some(&json!("Black")));
    }

    #[test]
    fn envelope_without_data_uses_the_body() {
        let payload = parse_envelope(br#"{"success": true, "region_code": "AB"}"#)
            .expect("valid envelope");
        assert_eq!(payload.region_code.as_deref(), Some("AB"));
        assert_eq!(payload.raw.get("success"), Some(&json!(true)));
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let err = parse_envelope(br#"{"success": false, "message": "quota exceeded"}"#)
            .expect_err("failure flag");
        assert!(matches!(err, ApiError::Rejected(ref message) if message == "quota exceeded"));

        let err = parse_envelope(br#"{"data": {"region_code": "B"}}"#).expect_err("missing flag");
        assert!(matches!(err, ApiError::Rejected(ref message) if message == "Unknown error"));
    }

    #[test]
    fn malformed_bodies_are_reported() {
        let bodies: [&[u8]; 5] = [
            b"<html>oops</html>",
            br#"[1, 2, 3]"#,
            br#"{"success": "yes"}"#,
            br#"{"success": true, "data": "B"}"#,
            br#"{"success": true, "data": {"vehicle_type": 4}}"#,
        ];
        for body in bodies {
            assert!(
                matches!(parse_envelope(body), Err(ApiError::Malformed(_))),
                "{} should be malformed",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn invalid_api_key_is_a_build_error() {
        let config = RapidApiConfig::default().with_api_key("bad\nkey");
        assert!(matches!(
            RapidApiLookupPort::new(config),
            Err(BuildError::InvalidHeader { name: KEY_HEADER, .. })
        ));
    }

    #[test]
    fn unusable_base_url_is_a_build_error() {
        let config = RapidApiConfig::default().with_base_url("cek-nopol-kendaraan");
        assert!(matches!(
            RapidApiLookupPort::new(config),
            Err(BuildError::Config(ConfigError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn endpoint_is_resolved_once() {
        let port = RapidApiLookupPort::new(
            RapidApiConfig::default().with_base_url("http://127.0.0.1:9000/api"),
        )
        .expect("valid config");
        assert_eq!(port.endpoint.as_str(), "http://127.0.0.1:9000/api/check");
    }
}
