//! The persisted access/refresh credential pair.

use serde::{Deserialize, Serialize};

use super::expiry;

/// Which persistence tier holds a credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageTier {
    /// Survives across sessions (kept when the user asked to stay signed in).
    Durable,
    /// Cleared when the session ends.
    Session,
}

/// The credential pair persisted by the session layer.
///
/// Serialized in camelCase to match the wire and storage format. Fields the
/// server sends that this client has no name for are carried in `extra`, so
/// a full-replace write never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    /// Short-lived bearer credential attached to authorized calls.
    #[serde(default)]
    pub access_token: String,

    /// Long-lived credential used solely to obtain a new access credential.
    #[serde(default)]
    pub refresh_token: String,

    /// Authorization scheme label, usually "Bearer".
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Client-observed issuance time in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    /// Access-credential lifetime hint in seconds, paired with `issued_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Server-provided fields preserved verbatim across replaces.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// Tier the pair was read from. Attached on read, never serialized.
    #[serde(skip)]
    pub origin: Option<StorageTier>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl CredentialPair {
    /// Creates a pair from freshly issued token values.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            issued_at: None,
            expires_in: None,
            extra: serde_json::Map::new(),
            origin: None,
        }
    }

    /// When the access credential expires, in milliseconds since the epoch.
    ///
    /// The explicit `issued_at` + `expires_in` hint takes priority; otherwise
    /// the expiry embedded in the access token itself is decoded. `None`
    /// means no expiry is known.
    #[must_use]
    pub fn access_expires_at(&self) -> Option<i64> {
        if let (Some(issued_at), Some(expires_in)) = (self.issued_at, self.expires_in) {
            return Some(issued_at + expires_in * 1000);
        }
        expiry::claim_expiry_ms(&self.access_token)
    }

    /// When the refresh credential expires, decoded from the token itself.
    #[must_use]
    pub fn refresh_expires_at(&self) -> Option<i64> {
        expiry::claim_expiry_ms(&self.refresh_token)
    }

    /// Whether the access credential is expired at `now_ms`, skew applied.
    ///
    /// A pair with no known expiry is never expired.
    #[must_use]
    pub fn is_access_expired(&self, now_ms: i64) -> bool {
        expiry::is_expired(self.access_expires_at(), now_ms)
    }

    /// Whether the refresh credential is expired at `now_ms`, skew applied.
    #[must_use]
    pub fn is_refresh_expired(&self, now_ms: i64) -> bool {
        expiry::is_expired(self.refresh_expires_at(), now_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use pretty_assertions::assert_eq;

    fn jwt_with_exp(exp_secs: i64) -> String {
        let claims = serde_json::json!({ "exp": exp_secs });
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(claims.to_string()))
    }

    #[test]
    fn test_hint_fields_take_priority_over_token_claims() {
        let mut pair = CredentialPair::new(jwt_with_exp(1_000), "refresh");
        pair.issued_at = Some(5_000_000);
        pair.expires_in = Some(60);

        assert_eq!(pair.access_expires_at(), Some(5_000_000 + 60_000));
    }

    #[test]
    fn test_falls_back_to_access_token_claims() {
        let pair = CredentialPair::new(jwt_with_exp(2_000), "refresh");
        assert_eq!(pair.access_expires_at(), Some(2_000_000));
    }

    #[test]
    fn test_refresh_expiry_ignores_hint_fields() {
        let mut pair = CredentialPair::new("opaque", jwt_with_exp(3_000));
        pair.issued_at = Some(1);
        pair.expires_in = Some(1);

        assert_eq!(pair.refresh_expires_at(), Some(3_000_000));
    }

    #[test]
    fn test_opaque_tokens_never_expire() {
        let pair = CredentialPair::new("opaque-access", "opaque-refresh");
        assert_eq!(pair.access_expires_at(), None);
        assert!(!pair.is_access_expired(i64::MAX));
        assert!(!pair.is_refresh_expired(i64::MAX));
    }

    #[test]
    fn test_serde_round_trip_preserves_extra_fields() {
        let raw = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "tokenType": "Bearer",
            "issuedAt": 123,
            "userName": "ada"
        }"#;
        let pair: CredentialPair = serde_json::from_str(raw).unwrap();
        assert_eq!(pair.issued_at, Some(123));
        assert_eq!(pair.extra.get("userName").unwrap(), "ada");

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json.get("userName").unwrap(), "ada");
        // origin is derived at read time, never written.
        assert!(json.get("origin").is_none());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let pair: CredentialPair =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(pair.token_type, "Bearer");
    }
}
