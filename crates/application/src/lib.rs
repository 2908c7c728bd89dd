//! Nimbus Application - The session engine
//!
//! This crate implements the credential lifecycle over a set of ports:
//! two-tier persistence of the access/refresh pair, single-flight renewal,
//! the bounded retry-after-refresh request executor, response-envelope
//! decoding, and session-state notifications. Concrete adapters live in
//! `nimbus-infrastructure`.

pub mod config;
pub mod ports;
pub mod session;

pub use config::SessionConfig;
pub use ports::{
    Clock, HttpMethod, HttpTransport, KeyValueStore, RawResponse, StorageError, TransportError,
    TransportRequest,
};
pub use session::{
    NotificationBus, RefreshCoordinator, RequestOptions, SessionClient, SessionObserver,
    TokenStore, decode_envelope,
};
