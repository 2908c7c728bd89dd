//! Single-flight renewal of the credential pair.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use nimbus_domain::{CredentialPair, SessionError, SessionResult, StorageTier};
use serde_json::{Value, json};
use tracing::debug;

use super::envelope::decode_envelope;
use super::{NotificationBus, TokenStore};
use crate::SessionConfig;
use crate::ports::{Clock, HttpTransport, TransportRequest};

type RenewalHandle = Shared<BoxFuture<'static, SessionResult<CredentialPair>>>;

/// Serializes concurrent renewal attempts into one network call.
///
/// The in-flight handle is recorded under the slot lock before the renewal
/// future is ever polled, so a caller arriving while a renewal is
/// outstanding joins it instead of racing a second call. The renewal
/// future clears the slot itself the moment it completes, before any
/// waiter resumes, so a failed attempt never locks out the next one and a
/// cancelled caller never strands a finished handle in the slot.
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<TokenStore>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    bus: Arc<NotificationBus>,
    config: SessionConfig,
    in_flight: Mutex<Option<RenewalHandle>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator over the store and transport.
    pub fn new(
        store: Arc<TokenStore>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        bus: Arc<NotificationBus>,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                transport,
                clock,
                bus,
                config,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Renews the credential pair, joining any renewal already in flight.
    ///
    /// Every joined caller observes the same outcome: the freshly persisted
    /// pair, or the single failure of the shared attempt.
    ///
    /// # Errors
    ///
    /// `SessionExpired` when no renewable pair exists (the store is cleared
    /// as a side effect); otherwise whatever the renewal call produced
    /// (`NetworkUnavailable`, envelope failures). Failures other than
    /// `SessionExpired` leave the stored pair untouched.
    pub async fn refresh(&self) -> SessionResult<CredentialPair> {
        self.get_or_start().await
    }

    fn get_or_start(&self) -> RenewalHandle {
        let mut slot = lock_slot(&self.inner.in_flight);
        if let Some(handle) = slot.as_ref() {
            debug!("joining in-flight credential renewal");
            return handle.clone();
        }
        let inner = Arc::clone(&self.inner);
        let handle = async move {
            let outcome = inner.renew().await;
            // Only this attempt's handle can be in the slot right now, so
            // clearing unconditionally is safe.
            *lock_slot(&inner.in_flight) = None;
            outcome
        }
        .boxed()
        .shared();
        *slot = Some(handle.clone());
        handle
    }
}

fn lock_slot(slot: &Mutex<Option<RenewalHandle>>) -> MutexGuard<'_, Option<RenewalHandle>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    async fn renew(&self) -> SessionResult<CredentialPair> {
        let Some(current) = self.store.read() else {
            self.store.clear();
            return Err(SessionError::SessionExpired);
        };
        if current.refresh_token.is_empty() || current.is_refresh_expired(self.clock.now_ms()) {
            self.store.clear();
            return Err(SessionError::SessionExpired);
        }

        let keep_login = current.origin != Some(StorageTier::Session);
        debug!(keep_login, "renewing credential pair");

        let request = TransportRequest::post(
            &self.config.refresh_path,
            json!({ "refreshToken": current.refresh_token }),
        );
        let raw = self.transport.send(&request).await?;
        let renewed = decode_envelope(&raw)?;

        let next = merge_renewed(&current, &renewed, self.clock.now_ms())?;
        self.store.save(&next, keep_login);
        self.bus.emit_refreshed("access/refresh credentials renewed");

        self.store.read().ok_or(SessionError::SessionExpired)
    }
}

/// Overlays the renewal response onto the previous pair.
///
/// Explicit fields in the response are authoritative overrides; every other
/// prior field, including ones this client has no name for, carries
/// forward. `issuedAt` is always restamped from the clock. The overlay
/// works on the JSON object form so the rule holds for unknown fields.
fn merge_renewed(
    previous: &CredentialPair,
    renewed: &Value,
    now_ms: i64,
) -> SessionResult<CredentialPair> {
    let mut merged = match serde_json::to_value(previous) {
        Ok(Value::Object(fields)) => fields,
        _ => return Err(SessionError::MalformedResponse),
    };
    if let Some(fields) = renewed.as_object() {
        for (name, value) in fields {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged.insert("issuedAt".to_string(), json!(now_ms));
    serde_json::from_value(Value::Object(merged)).map_err(|_| SessionError::MalformedResponse)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_overrides_tokens_and_restamps_issued_at() {
        let mut previous = CredentialPair::new("old-access", "old-refresh");
        previous.issued_at = Some(1_000);
        previous
            .extra
            .insert("userName".to_string(), json!("ada"));

        let renewed = json!({ "accessToken": "new-access", "refreshToken": "new-refresh" });
        let next = merge_renewed(&previous, &renewed, 5_000).unwrap();

        assert_eq!(next.access_token, "new-access");
        assert_eq!(next.refresh_token, "new-refresh");
        assert_eq!(next.issued_at, Some(5_000));
        assert_eq!(next.extra.get("userName").unwrap(), "ada");
    }

    #[test]
    fn test_merge_preserves_prior_refresh_token_when_response_omits_it() {
        let previous = CredentialPair::new("old-access", "old-refresh");
        let renewed = json!({ "accessToken": "new-access" });

        let next = merge_renewed(&previous, &renewed, 5_000).unwrap();
        assert_eq!(next.refresh_token, "old-refresh");
    }

    #[test]
    fn test_merge_tolerates_non_object_response_payload() {
        let previous = CredentialPair::new("old-access", "old-refresh");
        let next = merge_renewed(&previous, &Value::Null, 5_000).unwrap();

        assert_eq!(next.access_token, "old-access");
        assert_eq!(next.issued_at, Some(5_000));
    }
}
