//! Key-value persistence port

use thiserror::Error;

/// A write to a persistence tier failed.
#[derive(Debug, Error)]
#[error("storage write failed: {message}")]
pub struct StorageError {
    /// Description of the failure.
    pub message: String,
}

/// Port for one persistence tier.
///
/// The session engine is handed two of these: a durable tier that survives
/// restarts and a session tier that does not. Each holds at most one record
/// per key; reads of absent keys are `None`, removals of absent keys are
/// no-ops.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier cannot persist the value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &str);
}
