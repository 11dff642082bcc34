use std::time::Duration;

use thiserror::Error;

/// Failure raised by the remote data-access layer.
///
/// Only the presence (and value) of a response status matters to the
/// screens; everything else is carried for logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response object (offline, DNS, TLS...).
    #[error("No response: {0}")]
    NoResponse(String),

    /// The request did not complete within the configured fetch timeout.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl TransportError {
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            message: String::new(),
        }
    }

    pub fn no_response(reason: impl Into<String>) -> Self {
        Self::NoResponse(reason.into())
    }

    /// Response status, if a response object was present.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NoResponse(_) | Self::Timeout(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
