//! HTTP store client for the Quarry artifact cache.
//!
//! Build pipelines use this crate to avoid recomputing expensive artifacts:
//! a caller fingerprints its inputs into a [`CacheKey`](quarry_core::CacheKey)
//! and either fetches a previously published value or publishes a new one.
//! Values travel as gzip-compressed JSON over keep-alive HTTP connections,
//! one pool per traffic direction.

pub mod codec;
pub mod config;
pub mod endpoint;
pub mod pool;
pub mod stats;
pub mod store;

pub use config::{AddressFamily, StoreConfig, DEFAULT_TIMEOUT};
pub use endpoint::{ResolvedEndpoint, Scheme};
pub use stats::{StatsSnapshot, StoreStats};
pub use store::{ArtifactStore, HttpStore};
