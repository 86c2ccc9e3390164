use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use moka::{Expiry, future::Cache};
use reqwest::Url;

use crate::prelude::*;

/// HTTP client which keeps successful response bodies for the requested time-to-live.
pub struct Client {
    inner: reqwest::Client,
    cache: Cache<Url, CacheEntry>,
}

impl Client {
    /// Build the client whose cache holds at most `capacity` bodies.
    pub fn try_new(timeout: Duration, capacity: u64) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let cache = Cache::builder().max_capacity(capacity).expire_after(EntryTtl).build();
        Ok(Self { inner, cache })
    }

    /// Fetch the body, or return the cached one if it is still fresh.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get(&self, url: Url, ttl: Duration) -> Result<Arc<[u8]>> {
        if let Some(entry) = self.cache.get(&url).await {
            debug!("cache hit");
            return Ok(entry.body);
        }
        info!("fetching…");
        let body: Arc<[u8]> = self
            .inner
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to call `{url}`"))?
            .error_for_status()
            .with_context(|| format!("request to `{url}` failed"))?
            .bytes()
            .await
            .with_context(|| format!("failed to read the response from `{url}`"))?
            .to_vec()
            .into();
        debug!(n_bytes = body.len(), "fetched");
        self.cache.insert(url, CacheEntry { body: Arc::clone(&body), ttl }).await;
        Ok(body)
    }
}

#[derive(Clone)]
struct CacheEntry {
    body: Arc<[u8]>,
    ttl: Duration,
}

/// Expires every entry after the time-to-live it was stored with.
struct EntryTtl;

impl Expiry<Url, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _url: &Url,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}
