//! Nimbus Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: the reqwest transport, the
//! system clock, and the two persistence tiers.

pub mod adapters;
pub mod persistence;

pub use adapters::{ReqwestTransport, SystemClock};
pub use persistence::{FileStore, MemoryStore};
