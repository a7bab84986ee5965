//! HTTP store operations.
//!
//! One store serves any number of concurrent `get`/`set` calls; each call
//! borrows a socket slot from its direction's pool, performs a single
//! request/response cycle, and resolves independently of the others.

use crate::codec::{self, GzJsonDecoder};
use crate::config::StoreConfig;
use crate::endpoint::ResolvedEndpoint;
use crate::pool::{DirectionPool, PoolOptions};
use crate::stats::{StatsSnapshot, StoreStats};
use async_trait::async_trait;
use quarry_core::{CacheKey, Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Uniform store interface expected by pipeline callers.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Fetch the value stored under `key`. `Ok(None)` is a miss, not an
    /// error.
    async fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>>;

    /// Publish a value under `key`.
    async fn set(&self, key: &CacheKey, value: &serde_json::Value) -> Result<()>;

    /// Remove all stored values.
    async fn clear(&self) -> Result<()>;
}

/// Client for a remote artifact cache addressed by an HTTP endpoint.
///
/// Values are fetched with `GET {base}/{hex(key)}` and published with
/// `PUT {base}/{hex(key)}`, the body being gzip-compressed JSON in both
/// directions. Dropping the store closes its idle keep-alive sockets.
pub struct HttpStore {
    endpoint: ResolvedEndpoint,
    read_pool: DirectionPool,
    write_pool: DirectionPool,
    stats: StoreStats,
}

impl HttpStore {
    /// Build a store from its configuration.
    ///
    /// A malformed endpoint fails here, never on first use.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let endpoint = ResolvedEndpoint::parse(&config.endpoint)?;
        let options = PoolOptions::from_config(&config);

        Ok(HttpStore {
            endpoint,
            read_pool: DirectionPool::new(&options)?,
            write_pool: DirectionPool::new(&options)?,
            stats: StoreStats::new(),
        })
    }

    /// Typed fetch. `Ok(None)` is a miss.
    ///
    /// The body streams through the gzip decoder chunk by chunk; JSON is
    /// parsed only once the stream has completed.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let url = self.endpoint.url_for(key);
        let _permit = self.read_pool.acquire().await;
        debug!(%key, %url, "cache get");

        let mut response = self
            .read_pool
            .client()
            .get(&url)
            .send()
            .await
            .map_err(classify_transport)?;

        match response.status().as_u16() {
            404 => {
                drain(&mut response).await?;
                self.stats.record_miss();
                debug!(%key, "cache miss");
                Ok(None)
            }
            200 => {
                let mut decoder = GzJsonDecoder::new();
                let mut downloaded = 0u64;
                while let Some(chunk) = response.chunk().await.map_err(classify_transport)? {
                    downloaded += chunk.len() as u64;
                    decoder.feed(&chunk)?;
                }
                let value = decoder.finish()?;
                self.stats.record_hit(downloaded);
                debug!(%key, bytes = downloaded, "cache hit");
                Ok(Some(value))
            }
            status => {
                drain(&mut response).await?;
                warn!(%key, status, "cache responded with unexpected status");
                Err(Error::Protocol { status })
            }
        }
    }

    /// Typed publish.
    ///
    /// The response status is deliberately ignored: once the exchange
    /// completes the write counts as delivered, and only a stream fault
    /// fails it. Pipeline callers rely on this fire-and-forget contract.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let body = codec::encode(value)?;
        let uploaded = body.len() as u64;

        let url = self.endpoint.url_for(key);
        let _permit = self.write_pool.acquire().await;
        debug!(%key, %url, bytes = uploaded, "cache put");

        let mut response = self
            .write_pool
            .client()
            .put(&url)
            .body(body)
            .send()
            .await
            .map_err(classify_transport)?;

        drain(&mut response).await?;
        self.stats.record_upload(uploaded);
        Ok(())
    }

    /// Counter snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// The endpoint this store talks to.
    pub fn endpoint(&self) -> &ResolvedEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ArtifactStore for HttpStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>> {
        self.get_as(key).await
    }

    async fn set(&self, key: &CacheKey, value: &serde_json::Value) -> Result<()> {
        self.put(key, value).await
    }

    /// Unimplemented: eviction is owned by the service. Returns immediately
    /// without any network activity.
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Read and discard the rest of a response body, freeing the socket for
/// keep-alive reuse.
async fn drain(response: &mut reqwest::Response) -> Result<()> {
    while response.chunk().await.map_err(classify_transport)?.is_some() {}
    Ok(())
}

/// Map a transport-layer fault onto the error taxonomy.
///
/// Statuses never arrive here; they are classified from the response
/// itself.
fn classify_transport(err: reqwest::Error) -> Error {
    Error::Transport {
        code: fault_code(&err),
        message: err.to_string(),
    }
}

/// Surface the underlying io fault kind, when one exists in the source
/// chain.
fn fault_code(err: &reqwest::Error) -> Option<String> {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return Some(format!("{:?}", io.kind()));
        }
        source = inner.source();
    }
    err.is_timeout().then(|| "TimedOut".to_string())
}
