//! Shared error type across callstats crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message or config.
    BadRequest,
    /// Unsupported protocol or config version.
    UnsupportedVersion,
    /// Metric registration or exposition failed.
    MetricsUnavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::MetricsUnavailable => "METRICS_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("metrics: {0}")]
    Metrics(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl StatsError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StatsError::BadRequest(_) => ClientCode::BadRequest,
            StatsError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StatsError::Metrics(_) => ClientCode::MetricsUnavailable,
            StatsError::Internal(_) => ClientCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_codes_are_stable() {
        assert_eq!(StatsError::BadRequest("x".into()).client_code().as_str(), "BAD_REQUEST");
        assert_eq!(StatsError::Metrics("dup".into()).client_code().as_str(), "METRICS_UNAVAILABLE");
        assert_eq!(StatsError::UnsupportedVersion.to_string(), "unsupported version");
    }
}
