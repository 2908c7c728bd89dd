//! Session error taxonomy

use thiserror::Error;

/// Failures surfaced by the session layer.
///
/// Every variant renders as a single user-displayable message, so a UI can
/// show any of them verbatim. `SessionExpired` is additionally a signal that
/// the stored credentials have been cleared and the user must sign in again.
///
/// The type is `Clone` because a single renewal outcome fans out to every
/// caller joined on the in-flight renewal handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No usable credential remains; the user must re-authenticate.
    #[error("your session has expired, please sign in again")]
    SessionExpired,

    /// The transport could not reach the server at all.
    #[error("could not reach the server: {message}")]
    NetworkUnavailable {
        /// Transport-level description of the failure.
        message: String,
    },

    /// The server failed outright: a failure status with no readable body.
    #[error("the server encountered a problem (HTTP {status})")]
    ServerFault {
        /// HTTP status code of the failed response.
        status: u16,
    },

    /// HTTP success with an empty body where a payload was expected.
    #[error("the server returned an empty response, please try again")]
    EmptyResponse,

    /// HTTP success with a body that is not valid JSON.
    #[error("the server returned an unreadable response, please try again")]
    MalformedResponse,

    /// Declared HTTP failure carrying a server-provided message.
    #[error("{message}")]
    RequestFailed {
        /// Server-provided (or fallback) description of the failure.
        message: String,
    },

    /// HTTP success but the business envelope declared a failure.
    #[error("{message}")]
    BusinessFailure {
        /// Server-provided (or fallback) description of the failure.
        message: String,
    },
}

impl SessionError {
    /// Returns true when the failure means the session itself is gone.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_displayable() {
        let err = SessionError::RequestFailed {
            message: "name already taken".to_string(),
        };
        assert_eq!(err.to_string(), "name already taken");

        let err = SessionError::ServerFault { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_is_session_expired() {
        assert!(SessionError::SessionExpired.is_session_expired());
        assert!(!SessionError::EmptyResponse.is_session_expired());
    }
}
