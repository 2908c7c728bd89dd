//! Best-effort expiry decoding for opaque bearer tokens.
//!
//! Decoding only, never trust: the token's signature is not checked. A
//! missing or unreadable expiry must never make a credential look already
//! expired, so every failure path yields `None`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Grace period subtracted from a literal expiry instant, in milliseconds.
///
/// A credential is treated as expired this long *before* its literal expiry
/// so that a call carrying it does not die mid-flight.
pub const EXPIRY_SKEW_MS: i64 = 5_000;

/// Whether an expiry instant has passed, skew applied, at `now_ms`.
///
/// `None` means "no known expiry" and is never expired. The skew boundary
/// is inclusive: an expiry exactly `EXPIRY_SKEW_MS` away counts as expired.
/// The subtraction saturates; a garbage claim decoded to `i64::MIN` must
/// not panic here.
pub(crate) fn is_expired(expires_at_ms: Option<i64>, now_ms: i64) -> bool {
    expires_at_ms.is_some_and(|at| now_ms >= at.saturating_sub(EXPIRY_SKEW_MS))
}

/// Decode the numeric `exp` claim embedded in a JWT-shaped token.
///
/// Splits on `.`, base64url-decodes the second segment (tolerating standard
/// alphabet and stray padding), parses the payload as JSON, and converts the
/// `exp` claim from seconds to milliseconds since the epoch.
///
/// Returns `None` for any token that is not shaped like a JWT, carries a
/// non-JSON payload, or has no finite numeric `exp`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn claim_expiry_ms(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let normalized = payload.replace('+', "-").replace('/', "_");
    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_f64()?;
    if !exp.is_finite() {
        return None;
    }
    Some((exp * 1000.0) as i64)
}
