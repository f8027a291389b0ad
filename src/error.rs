// src/error.rs
use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Which bounding-box axis collapsed to zero extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateAxis {
    /// Every marker shares the same latitude (`x`).
    Latitude,
    /// Every marker shares the same longitude (`y`).
    Longitude,
    /// Both axes collapsed, e.g. a single marker.
    Both,
}

impl fmt::Display for DegenerateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateAxis::Latitude => write!(f, "latitude"),
            DegenerateAxis::Longitude => write!(f, "longitude"),
            DegenerateAxis::Both => write!(f, "latitude and longitude"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("No markers to render: a bounding box needs at least one marker")]
    EmptyInput,

    #[error("Degenerate {0} axis: all markers share the same value, the extent is zero")]
    DegenerateAxis(DegenerateAxis),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Drawing surface error: {0}")]
    Surface(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonDeserializationFailed(String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid class name: {0}")]
    InvalidClassName(String),

    #[error("Master key required: {0}")]
    MasterKeyRequired(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Other store error (Code: {code}): {message}")]
    OtherStoreError { code: u16, message: String },
}

impl MapError {
    /// Creates a `MapError` from an HTTP status code and a JSON response body returned by the store.
    pub(crate) fn from_response(status_code: u16, response_body: Value) -> Self {
        let error_code = response_body
            .get("code")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u16;
        let error_message = response_body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();

        match error_code {
            100 => MapError::ConnectionFailed(format!("({}) {}", error_code, error_message)),
            // Invalid username/password also comes back as 101
            101 => MapError::ObjectNotFound(format!("({}) {}", error_code, error_message)),
            102 => MapError::InvalidQuery(format!("({}) {}", error_code, error_message)),
            103 => MapError::InvalidClassName(format!("({}) {}", error_code, error_message)),
            119 => MapError::MasterKeyRequired(format!("({}) {}", error_code, error_message)),
            209 => MapError::AuthenticationError(format!(
                "Invalid session token: ({}) {}",
                error_code, error_message
            )),
            _ => {
                if status_code >= 500 {
                    MapError::InternalServerError(format!(
                        "Server error (HTTP {}): ({}) {}",
                        status_code, error_code, error_message
                    ))
                } else if status_code == 401 || status_code == 403 {
                    MapError::AuthenticationError(format!(
                        "Auth error (HTTP {}): ({}) {}",
                        status_code, error_code, error_message
                    ))
                } else if status_code == 404 {
                    MapError::ObjectNotFound(format!(
                        "Not found (HTTP {}): ({}) {}",
                        status_code, error_code, error_message
                    ))
                } else {
                    MapError::OtherStoreError {
                        code: error_code,
                        message: error_message,
                    }
                }
            }
        }
    }
}
