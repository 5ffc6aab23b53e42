//! Traits describing the remote lookup backend and shared error types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::{Map, Value};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by the TNKB service.
pub enum TnkbError {
    /// The plate number is malformed.
    #[error("Invalid plate: {0}")]
    InvalidPlate(String),
    /// The remote lookup failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    /// Reserved for stricter validation rules than the plate pattern.
    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the remote lookup backend.
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout {
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// The connection could not be established.
    #[error("Network connection error: {0}")]
    Network(String),
    /// The backend answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    Status {
        /// Status code of the last attempt.
        status: u16,
    },
    /// The backend reported an application-level failure.
    #[error("API reported failure: {0}")]
    Rejected(String),
    /// The response body does not follow the expected schema.
    #[error("Invalid API response: {0}")]
    Malformed(String),
    /// Any other transport failure.
    #[error("API request failed: {0}")]
    Transport(#[from] ReqwestError),
}

/// HTTP statuses the backend may recover from on its own.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

impl ApiError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status } => RETRYABLE_STATUSES.contains(status),
            ApiError::Timeout { .. }
            | ApiError::Rejected(_)
            | ApiError::Malformed(_)
            | ApiError::Transport(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Successful lookup result, validated at the API boundary.
pub struct LookupPayload {
    /// Region code reported by the backend, if any.
    pub region_code: Option<String>,
    /// Vehicle type reported by the backend, if any.
    pub vehicle_type: Option<String>,
    /// Full payload object as returned by the backend.
    pub raw: Map<String, Value>,
}

impl TryFrom<Value> for LookupPayload {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = match value {
            Value::Object(raw) => raw,
            other => {
                return Err(ApiError::Malformed(format!(
                    "expected a JSON object payload, got {}",
                    json_kind(&other)
                )));
            }
        };

        let region_code = optional_string(&raw, "region_code")?;
        let vehicle_type = optional_string(&raw, "vehicle_type")?;

        Ok(Self {
            region_code,
            vehicle_type,
            raw,
        })
    }
}

fn optional_string(raw: &Map<String, Value>, key: &str) -> Result<Option<String>, ApiError> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(ApiError::Malformed(format!(
            "field `{key}` must be a string, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
/// Trait for remote plate lookup backends.
pub trait PlateLookupPort: Send + Sync {
    /// Short name of the backend, used in log output.
    fn name(&self) -> &str;

    /// Look up a normalized plate number.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the backend is unreachable, times out,
    /// rejects the request, or answers with an unexpected body.
    async fn lookup(&self, plate: &str) -> Result<LookupPayload, ApiError>;
}

/// Port that never reaches a backend; every lookup reports the remote as unavailable.
pub struct OfflinePort;

#[async_trait]
impl PlateLookupPort for OfflinePort {
    fn name(&self) -> &str {
        "offline"
    }

    async fn lookup(&self, _plate: &str) -> Result<LookupPayload, ApiError> {
        Err(ApiError::Network("offline mode, remote lookup disabled".to_owned()))
    }
}
