use std::fmt;

/// Transport-level failures
///
/// Raised only when an exchange never produced a usable response, from
/// connectivity issues to an unreadable body. Responses with an error status
/// are not an `HttpError`; they go through the coupler instead.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Network-related errors (connection refused, DNS, TLS, etc.)
    Network(String),
    /// The request did not complete within the configured timeout
    Timeout(String),
    /// The response body could not be read
    Body(String),
    /// Unsupported HTTP method
    UnsupportedMethod(String),
    /// Other errors
    Other(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::Network(msg) => write!(f, "Network error: {msg}"),
            HttpError::Timeout(msg) => write!(f, "Request timed out: {msg}"),
            HttpError::Body(msg) => write!(f, "Failed to read response body: {msg}"),
            HttpError::UnsupportedMethod(method) => {
                write!(f, "Unsupported HTTP method: {method}")
            }
            HttpError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for HttpError {}
