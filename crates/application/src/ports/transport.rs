//! HTTP transport port

use async_trait::async_trait;
use nimbus_domain::SessionError;
use serde_json::Value;
use thiserror::Error;

/// HTTP method of an outgoing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

/// One fully assembled outgoing call.
///
/// The engine decides what to attach (including the `Authorization` value);
/// the transport only moves it.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the transport's base URL.
    pub path: String,
    /// Additional headers.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the call carries one.
    pub body: Option<Value>,
    /// Full `Authorization` header value, when the call carries one.
    pub authorization: Option<String>,
}

impl TransportRequest {
    /// Creates a bare request.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            authorization: None,
        }
    }

    /// Creates a POST request carrying a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(HttpMethod::Post, path);
        request.body = Some(body);
        request
    }
}

/// Raw result of one exchange.
///
/// Declared HTTP failures (4xx/5xx) are data, not errors; only failures to
/// produce any HTTP response at all surface as [`TransportError`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl RawResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the server rejected the call's authorization.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Transport-level failure: the exchange never produced an HTTP response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        /// Description of the failure.
        message: String,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}")]
    DnsFailure {
        /// Host that failed to resolve.
        host: String,
    },

    /// The exchange timed out.
    #[error("request timed out")]
    Timeout,

    /// The request could not be assembled or sent.
    #[error("{message}")]
    InvalidRequest {
        /// Description of the failure.
        message: String,
    },
}

impl From<TransportError> for SessionError {
    fn from(error: TransportError) -> Self {
        Self::NetworkUnavailable {
            message: error.to_string(),
        }
    }
}

/// Port for performing one HTTP exchange.
///
/// Implementations apply no retries and no authorization logic; timeout
/// semantics belong to the underlying transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the exchange and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response was produced.
    async fn send(&self, request: &TransportRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(RawResponse { status: 204, body: String::new() }.is_success());
        assert!(!RawResponse { status: 401, body: String::new() }.is_success());
        assert!(RawResponse { status: 401, body: String::new() }.is_unauthorized());
    }

    #[test]
    fn test_transport_error_maps_to_network_unavailable() {
        let error = TransportError::ConnectionFailed {
            message: "refused".to_string(),
        };
        let session_error: SessionError = error.into();
        assert!(matches!(
            session_error,
            SessionError::NetworkUnavailable { .. }
        ));
    }
}
