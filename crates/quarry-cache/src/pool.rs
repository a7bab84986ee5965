//! Direction-scoped connection pools.
//!
//! Each store owns two independent pools, one for GET traffic and one for
//! PUT traffic, so slow uploads cannot starve reads of sockets. reqwest's
//! client handles keep-alive reuse and caps the idle set; the semaphore
//! enforces the concurrent-socket ceiling on top, since in-flight sockets
//! are not bounded by the idle limit.

use crate::config::{AddressFamily, StoreConfig};
use quarry_core::{Error, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Concurrent-socket ceiling per direction.
pub const MAX_SOCKETS: usize = 64;
/// Idle-socket ceiling per direction.
pub const MAX_IDLE_SOCKETS: usize = 64;

/// Pool parameters, identical for the read and write pools.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_sockets: usize,
    pub max_idle_sockets: usize,
    /// TCP keep-alive refresh interval; follows the request timeout.
    pub keep_alive: Duration,
    /// Total per-request timeout, connect through body completion.
    pub timeout: Duration,
    /// Local bind address implementing the IP-family hint.
    pub local_addr: Option<IpAddr>,
}

impl PoolOptions {
    pub fn from_config(config: &StoreConfig) -> Self {
        let local_addr = config.family.map(|family| match family {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        });

        PoolOptions {
            max_sockets: MAX_SOCKETS,
            max_idle_sockets: MAX_IDLE_SOCKETS,
            keep_alive: config.timeout,
            timeout: config.timeout,
            local_addr,
        }
    }
}

/// A keep-alive connection pool dedicated to one traffic direction.
pub struct DirectionPool {
    client: reqwest::Client,
    permits: Semaphore,
}

impl DirectionPool {
    pub fn new(options: &PoolOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(options.max_idle_sockets)
            .tcp_keepalive(options.keep_alive)
            .timeout(options.timeout);
        if let Some(addr) = options.local_addr {
            builder = builder.local_address(addr);
        }

        let client = builder.build().map_err(|e| Error::Transport {
            message: format!("failed to build HTTP client: {}", e),
            code: None,
        })?;

        Ok(DirectionPool {
            client,
            permits: Semaphore::new(options.max_sockets),
        })
    }

    /// Borrow a socket slot, waiting if the direction is saturated. The
    /// permit is held for the full request/response cycle.
    pub async fn acquire(&self) -> SemaphorePermit<'_> {
        self.permits.acquire().await.expect("pool semaphore closed")
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Socket slots currently available.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_follow_timeout() {
        let mut config = StoreConfig::new("http://cache.internal/c");
        config.timeout = Duration::from_millis(250);
        let options = PoolOptions::from_config(&config);
        assert_eq!(options.keep_alive, Duration::from_millis(250));
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert_eq!(options.max_sockets, 64);
        assert_eq!(options.max_idle_sockets, 64);
    }

    #[test]
    fn test_family_hint_binds_local_address() {
        let mut config = StoreConfig::new("http://cache.internal/c");
        config.family = Some(AddressFamily::V4);
        let options = PoolOptions::from_config(&config);
        assert_eq!(options.local_addr, Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)));

        config.family = Some(AddressFamily::V6);
        let options = PoolOptions::from_config(&config);
        assert_eq!(options.local_addr, Some(IpAddr::V6(Ipv6Addr::UNSPECIFIED)));
    }

    #[tokio::test]
    async fn test_acquire_consumes_permits() {
        let options = PoolOptions::from_config(&StoreConfig::default());
        let pool = DirectionPool::new(&options).unwrap();
        assert_eq!(pool.available(), 64);

        let permit = pool.acquire().await;
        assert_eq!(pool.available(), 63);
        drop(permit);
        assert_eq!(pool.available(), 64);
    }
}
