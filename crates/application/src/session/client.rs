//! The session facade and request executor.

use std::sync::Arc;

use nimbus_domain::{CredentialPair, SessionError, SessionResult};
use serde_json::{Value, json};
use tracing::debug;

use super::envelope::decode_envelope;
use super::{NotificationBus, RefreshCoordinator, SessionObserver, TokenStore};
use crate::SessionConfig;
use crate::ports::{Clock, HttpMethod, HttpTransport, KeyValueStore, RawResponse, TransportRequest};

/// Per-call options for [`SessionClient::execute`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, GET by default.
    pub method: HttpMethod,
    /// Additional headers.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the call carries one.
    pub body: Option<Value>,
    /// Whether the call requires a valid credential.
    pub auth: bool,
    /// Overrides the configured scheme label for this call.
    pub token_type: Option<String>,
}

impl RequestOptions {
    /// A plain GET.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A POST carrying a JSON body.
    #[must_use]
    pub fn post(body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::default()
        }
    }

    /// A PUT carrying a JSON body.
    #[must_use]
    pub fn put(body: Value) -> Self {
        Self {
            method: HttpMethod::Put,
            body: Some(body),
            ..Self::default()
        }
    }

    /// Marks the call as requiring a valid credential.
    #[must_use]
    pub fn authorized(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Overrides the scheme label for this call.
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Adds a header to the call.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The session facade.
///
/// Holds the credential pair across two persistence tiers, renews it
/// transparently before or immediately after expiry, and retries an
/// authorization-rejected call exactly once after a forced renewal.
pub struct SessionClient {
    store: Arc<TokenStore>,
    refresh: RefreshCoordinator,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    bus: Arc<NotificationBus>,
    config: SessionConfig,
}

impl SessionClient {
    /// Wires the engine together over the injected tiers, transport and
    /// clock.
    #[must_use]
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        let bus = Arc::new(NotificationBus::new(config.refresh_notice));
        let store = Arc::new(TokenStore::new(
            durable,
            session,
            config.storage_key.clone(),
            Arc::clone(&clock),
            Arc::clone(&bus),
        ));
        let refresh = RefreshCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            Arc::clone(&clock),
            Arc::clone(&bus),
            config.clone(),
        );
        Self {
            store,
            refresh,
            transport,
            clock,
            bus,
            config,
        }
    }

    /// Registers an observer of session-state changes.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.bus.subscribe(observer);
    }

    /// Enables or disables the refreshed notification at runtime.
    pub fn set_refresh_notice(&self, enabled: bool) {
        self.bus.set_refresh_notice(enabled);
    }

    /// Stores a freshly issued pair, durably when `keep_login`.
    pub fn save_credentials(&self, pair: &CredentialPair, keep_login: bool) {
        self.store.save(pair, keep_login);
    }

    /// Clears the stored pair from both tiers.
    pub fn clear_credentials(&self) {
        self.store.clear();
    }

    /// The current pair, if a session exists.
    #[must_use]
    pub fn get_credentials(&self) -> Option<CredentialPair> {
        self.store.read()
    }

    /// Returns a pair whose access credential has not passed its expiry.
    ///
    /// An already-valid pair is returned without any network call; an
    /// expired one triggers (or joins) a renewal.
    ///
    /// # Errors
    ///
    /// `SessionExpired` when no pair is stored, the pair has no access
    /// token, or renewal fails for any reason; the store is cleared before
    /// the failure propagates.
    pub async fn ensure_valid_access_token(&self) -> SessionResult<CredentialPair> {
        let Some(pair) = self
            .store
            .read()
            .filter(|pair| !pair.access_token.is_empty())
        else {
            return Err(SessionError::SessionExpired);
        };
        if !pair.is_access_expired(self.clock.now_ms()) {
            return Ok(pair);
        }
        match self.refresh.refresh().await {
            Ok(renewed) if !renewed.access_token.is_empty() => Ok(renewed),
            _ => {
                self.store.clear();
                Err(SessionError::SessionExpired)
            }
        }
    }

    /// Executes one API call against the envelope contract.
    ///
    /// Authorized calls get a valid access credential attached first. If
    /// the server still answers 401, the credential is renewed once and
    /// the call is re-issued once; the renewal is unconditional because
    /// the server, not the clock, declared the credential invalid. No
    /// further retries.
    ///
    /// # Errors
    ///
    /// `SessionExpired` when no usable credential remains (store cleared);
    /// `NetworkUnavailable` for transport failures (never retried); the
    /// envelope failures of [`decode_envelope`] otherwise.
    pub async fn execute(&self, path: &str, options: RequestOptions) -> SessionResult<Value> {
        let mut authorization = None;
        if options.auth {
            let pair = self.ensure_valid_access_token().await?;
            authorization = Some(self.authorization_value(&pair.access_token, &options));
        }

        let mut response = self.send(path, &options, authorization).await?;

        if options.auth && response.is_unauthorized() {
            debug!(path, "authorized call rejected, renewing once");
            let renewed = match self.refresh.refresh().await {
                Ok(renewed) => renewed,
                Err(_) => {
                    self.store.clear();
                    return Err(SessionError::SessionExpired);
                }
            };
            let authorization = Some(self.authorization_value(&renewed.access_token, &options));
            response = self.send(path, &options, authorization).await?;
            if response.is_unauthorized() {
                // The server rejected a credential it just minted.
                self.store.clear();
                return Err(SessionError::SessionExpired);
            }
        }

        decode_envelope(&response)
    }

    /// Notifies the server that the session ends.
    ///
    /// Best-effort authorized with whatever pair is stored, using that
    /// pair's own scheme label. Does not clear the store itself; callers
    /// decide via [`SessionClient::clear_credentials`].
    ///
    /// # Errors
    ///
    /// `NetworkUnavailable` for transport failures; the envelope failures
    /// of [`decode_envelope`] otherwise.
    pub async fn logout(&self) -> SessionResult<Value> {
        let pair = self.store.read();
        let refresh_token = pair.as_ref().map(|p| p.refresh_token.clone());
        let authorization = pair
            .as_ref()
            .filter(|p| !p.access_token.is_empty())
            .map(|p| format!("{} {}", p.token_type, p.access_token));

        let mut request = TransportRequest::post(
            &self.config.logout_path,
            json!({ "refreshToken": refresh_token }),
        );
        request.authorization = authorization;

        let raw = self.transport.send(&request).await?;
        decode_envelope(&raw)
    }

    fn authorization_value(&self, access_token: &str, options: &RequestOptions) -> String {
        let scheme = options
            .token_type
            .as_deref()
            .unwrap_or(&self.config.default_token_type);
        format!("{scheme} {access_token}")
    }

    async fn send(
        &self,
        path: &str,
        options: &RequestOptions,
        authorization: Option<String>,
    ) -> SessionResult<RawResponse> {
        let request = TransportRequest {
            method: options.method,
            path: path.to_string(),
            headers: options.headers.clone(),
            body: options.body.clone(),
            authorization,
        };
        Ok(self.transport.send(&request).await?)
    }
}
