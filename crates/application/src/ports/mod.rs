//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session engine and external
//! systems. Each port is a trait that can be implemented by adapters in the
//! infrastructure layer, or by mocks in tests.

mod clock;
mod storage;
mod transport;

pub use clock::Clock;
pub use storage::{KeyValueStore, StorageError};
pub use transport::{HttpMethod, HttpTransport, RawResponse, TransportError, TransportRequest};
