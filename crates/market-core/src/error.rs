//! # Market Error Types
//!
//! Typed error handling for the student-market transaction engine.
//! All fallible operations return `Result<T, MarketError>`.

use thiserror::Error;

/// Core error type for all marketplace operations
#[derive(Debug, Error)]
pub enum MarketError {
    /// Configuration errors (missing processor credentials, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (empty item list, non-positive price, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Listing payload failed validation
    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    /// Payment processor rejected the operation
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Processor responded 2xx but the payload is unusable
    /// (e.g. create response with no approval link)
    #[error("Malformed processor response: {0}")]
    MalformedResponse(String),

    /// Network/HTTP error communicating with the processor
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Listing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Sign-in rejected (unknown user or bad credentials)
    #[error("Session rejected: {0}")]
    SessionRejected(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MarketError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::Configuration(_) => 500,
            MarketError::InvalidRequest(_) => 400,
            MarketError::InvalidListing(_) => 400,
            // Processor rejections surface as server errors with the
            // processor's detail attached, matching the original API.
            MarketError::ProviderError { .. } => 500,
            MarketError::MalformedResponse(_) => 500,
            MarketError::NetworkError(_) => 502,
            MarketError::Storage(_) => 500,
            MarketError::SessionRejected(_) => 401,
            MarketError::Serialization(_) => 500,
        }
    }

    /// Returns true if the caller may usefully re-initiate the operation.
    /// There is no automatic retry anywhere; this only informs messaging.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarketError::NetworkError(_) | MarketError::ProviderError { .. }
        )
    }
}

/// Result type alias for marketplace operations
pub type MarketResult<T> = Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MarketError::InvalidRequest("empty items".into()).status_code(),
            400
        );
        assert_eq!(
            MarketError::ProviderError {
                provider: "paypal".into(),
                message: "INTERNAL_SERVICE_ERROR".into()
            }
            .status_code(),
            500
        );
        assert_eq!(
            MarketError::Configuration("PAYPAL_CLIENT_ID not set".into()).status_code(),
            500
        );
        assert_eq!(MarketError::NetworkError("timeout".into()).status_code(), 502);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(MarketError::NetworkError("timeout".into()).is_retryable());
        assert!(!MarketError::InvalidRequest("bad data".into()).is_retryable());
        assert!(!MarketError::Configuration("missing".into()).is_retryable());
    }
}
