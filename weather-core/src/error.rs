//! Error taxonomy shared by the client, the resolver and the store.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
}

impl WeatherError {
    /// Classify a non-2xx response.
    pub fn from_status(status: StatusCode, what: &str, body: &str) -> Self {
        let detail = format!("{what} request failed with status {status}: {}", truncate_body(body));
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WeatherError::Unauthorized(detail),
            StatusCode::NOT_FOUND => WeatherError::NotFound(detail),
            _ => WeatherError::Transient(detail),
        }
    }

    /// Message for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "City not found".to_string(),
            Self::Unauthorized(_) => "Invalid API key".to_string(),
            Self::Transient(_) => "Failed to load weather".to_string(),
            Self::Malformed(_) => "Unexpected response from weather service".to_string(),
            Self::PermissionDenied => "Location denied".to_string(),
            Self::LocationUnavailable(_) => "Location unavailable".to_string(),
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
