//! Two-tier persistence of the credential pair.

use std::sync::Arc;

use nimbus_domain::{CredentialPair, StorageTier};
use tracing::warn;

use super::NotificationBus;
use crate::ports::{Clock, KeyValueStore};

/// Durable/session persistence of the credential pair.
///
/// Single source of truth for "do we have a session": a non-`None` result
/// from [`TokenStore::read`] always carries an unexpired refresh credential
/// read from exactly one tier. Storage problems are self-healed, never
/// surfaced.
pub struct TokenStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    key: String,
    clock: Arc<dyn Clock>,
    bus: Arc<NotificationBus>,
}

impl TokenStore {
    /// Creates a store over the two persistence tiers.
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
        bus: Arc<NotificationBus>,
    ) -> Self {
        Self {
            durable,
            session,
            key: key.into(),
            clock,
            bus,
        }
    }

    /// Replaces the stored pair, writing to the durable tier when
    /// `keep_login` and to the session tier otherwise.
    ///
    /// Both tiers are cleared first so the pair lives in exactly one of
    /// them. Emits the changed notification once.
    pub fn save(&self, pair: &CredentialPair, keep_login: bool) {
        self.wipe();
        match serde_json::to_string(pair) {
            Ok(record) => {
                let tier = if keep_login {
                    &self.durable
                } else {
                    &self.session
                };
                if let Err(error) = tier.set(&self.key, &record) {
                    warn!(%error, "failed to persist credential pair");
                }
            }
            Err(error) => warn!(%error, "failed to serialize credential pair"),
        }
        self.bus.emit_changed();
    }

    /// Reads the live pair, durable tier first.
    ///
    /// A corrupt record is deleted from its tier and treated as absent. A
    /// pair whose refresh credential is expired clears the whole store and
    /// reads as absent: a session with only a dead renewal credential is
    /// not a session.
    pub fn read(&self) -> Option<CredentialPair> {
        let pair = self
            .read_tier(StorageTier::Durable)
            .or_else(|| self.read_tier(StorageTier::Session))?;
        if pair.is_refresh_expired(self.clock.now_ms()) {
            self.clear();
            return None;
        }
        Some(pair)
    }

    /// Removes the pair from both tiers and emits the changed notification.
    ///
    /// Idempotent: clearing an empty store is a no-op apart from the
    /// notification.
    pub fn clear(&self) {
        self.wipe();
        self.bus.emit_changed();
    }

    fn read_tier(&self, tier: StorageTier) -> Option<CredentialPair> {
        let store = self.tier(tier);
        let raw = store.get(&self.key)?;
        match serde_json::from_str::<CredentialPair>(&raw) {
            Ok(mut pair) => {
                pair.origin = Some(tier);
                Some(pair)
            }
            Err(error) => {
                warn!(?tier, %error, "dropping corrupt credential record");
                store.remove(&self.key);
                None
            }
        }
    }

    const fn tier(&self, tier: StorageTier) -> &Arc<dyn KeyValueStore> {
        match tier {
            StorageTier::Durable => &self.durable,
            StorageTier::Session => &self.session,
        }
    }

    fn wipe(&self) {
        self.durable.remove(&self.key);
        self.session.remove(&self.key);
    }
}
