//! Persistence tier implementations.
//!
//! The session engine expects two `KeyValueStore` tiers: a durable one
//! that survives restarts ([`FileStore`]) and a session one that does not
//! ([`MemoryStore`]).

mod file_store;
mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
