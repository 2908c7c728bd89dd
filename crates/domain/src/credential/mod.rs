//! Credential pair model and expiry decoding.
//!
//! This module provides:
//! - The persisted access/refresh credential pair
//! - Best-effort decoding of a bearer token's embedded expiry

mod expiry;
mod pair;

pub use expiry::{EXPIRY_SKEW_MS, claim_expiry_ms};
pub use pair::{CredentialPair, StorageTier};
