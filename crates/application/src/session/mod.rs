//! The credential-lifecycle and request-retry engine.
//!
//! This module provides:
//! - Two-tier persistence of the credential pair (`TokenStore`)
//! - Single-flight renewal (`RefreshCoordinator`)
//! - The request executor with its bounded retry policy (`SessionClient`)
//! - Response-envelope decoding
//! - Session-state notifications (`NotificationBus`)

mod client;
mod envelope;
mod notify;
mod refresh;
mod store;

pub use client::{RequestOptions, SessionClient};
pub use envelope::decode_envelope;
pub use notify::{NotificationBus, SessionObserver};
pub use refresh::RefreshCoordinator;
pub use store::TokenStore;
