//! Store configuration.

use std::time::Duration;

/// Default per-request timeout. The pools' keep-alive refresh interval
/// follows whatever timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// IP version hint for resolving the endpoint host.
///
/// Expressed by binding the pool's local address to the unspecified address
/// of that family, which constrains name resolution to matching records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

/// Configuration for an [`HttpStore`](crate::HttpStore).
///
/// Immutable once the store is constructed; a malformed `endpoint` fails
/// construction rather than the first operation.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the cache service, e.g.
    /// `http://cache.internal:9280/v1/artifacts`.
    pub endpoint: String,
    /// Optional IP version hint. `None` lets the resolver decide.
    pub family: Option<AddressFamily>,
    /// Per-request timeout covering connect through body completion.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Configuration with the default timeout and no family hint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        StoreConfig {
            endpoint: endpoint.into(),
            family: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new("http://127.0.0.1:9280/cache")
    }
}
