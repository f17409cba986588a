//! Unified error types for the telemetry sink.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unified error type for the telemetry sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Listen host is not an IP address.
    #[error("invalid listen host {host:?}: {source}")]
    Address {
        /// The configured host.
        host: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while accepting a batch of readings.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Body is JSON but lacks a `readings` key.
    #[error("Invalid Format")]
    InvalidFormat,

    /// Body could not be parsed as JSON.
    #[error("{0}")]
    MalformedBody(String),

    /// A failure while stamping or storing a reading.
    #[error("{0}")]
    Processing(String),

    /// The HTTP layer refused the body (e.g. over the size limit).
    #[error("{0}")]
    BodyRejected(#[from] BytesRejection),
}

impl IngestError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::InvalidFormat => StatusCode::BAD_REQUEST,
            IngestError::MalformedBody(_) | IngestError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            IngestError::BodyRejected(rejection) => rejection.status(),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::MalformedBody(err.to_string())
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, SinkError>;
