//! Nimbus Domain - Core session types
//!
//! This crate defines the domain model for the Nimbus session layer.
//! All types here are pure Rust with no I/O dependencies: the persisted
//! credential pair, best-effort expiry decoding, and the session error
//! taxonomy.

pub mod credential;
pub mod error;

pub use credential::{CredentialPair, EXPIRY_SKEW_MS, StorageTier, claim_expiry_ms};
pub use error::{SessionError, SessionResult};
