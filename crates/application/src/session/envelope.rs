//! Decoding of the `{code, message, data}` response envelope.

use nimbus_domain::{SessionError, SessionResult};
use serde_json::Value;

use crate::ports::RawResponse;

const FALLBACK_REQUEST_FAILED: &str = "the request failed, please try again";
const FALLBACK_BUSINESS_FAILED: &str = "the server rejected the request";

/// Normalizes one raw HTTP result into a decoded payload or typed failure.
///
/// Callers always expect a payload, so an empty 2xx body is a failure too:
///
/// | body      | status  | outcome                                   |
/// |-----------|---------|-------------------------------------------|
/// | empty     | failure | `ServerFault` (status-coded)              |
/// | empty     | success | `EmptyResponse`                           |
/// | non-JSON  | failure | `ServerFault`                             |
/// | non-JSON  | success | `MalformedResponse`                       |
/// | JSON      | failure | `RequestFailed` with the server's message |
/// | JSON      | success, `code != 0` | `BusinessFailure`            |
/// | JSON      | success, `code == 0` | `Ok(data)`                   |
///
/// # Errors
///
/// As per the table above.
pub fn decode_envelope(response: &RawResponse) -> SessionResult<Value> {
    if response.body.is_empty() {
        if response.is_success() {
            return Err(SessionError::EmptyResponse);
        }
        return Err(SessionError::ServerFault {
            status: response.status,
        });
    }

    let Ok(payload) = serde_json::from_str::<Value>(&response.body) else {
        if response.is_success() {
            return Err(SessionError::MalformedResponse);
        }
        return Err(SessionError::ServerFault {
            status: response.status,
        });
    };

    if !response.is_success() {
        return Err(SessionError::RequestFailed {
            message: message_in(&payload, FALLBACK_REQUEST_FAILED),
        });
    }

    // A JSON `null` payload or a missing code counts as a business failure.
    if payload.get("code").and_then(Value::as_i64) != Some(0) {
        return Err(SessionError::BusinessFailure {
            message: message_in(&payload, FALLBACK_BUSINESS_FAILED),
        });
    }

    Ok(payload.get("data").cloned().unwrap_or(Value::Null))
}

fn message_in(payload: &Value, fallback: &str) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
