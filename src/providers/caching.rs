use crate::core::currency::{ExchangeRate, ExchangeRateProvider};
use crate::core::store::KeyValueBackend;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

pub const RATE_CACHE_KEY: &str = "exchange-rate";

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    value: ExchangeRate,
    expires_at: DateTime<Utc>,
}

/// Serves a fetched rate until its TTL runs out. The entry lives in a key-value backend
/// so it can outlive the process; failed fetches are never cached.
pub struct CachingRateProvider<T: ExchangeRateProvider> {
    inner: T,
    ttl: Duration,
    backend: Box<dyn KeyValueBackend>,
    lock: Mutex<()>,
}

impl<T: ExchangeRateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, ttl: Duration, backend: Box<dyn KeyValueBackend>) -> Self {
        Self {
            inner,
            ttl,
            backend,
            lock: Mutex::new(()),
        }
    }

    /// Ignores any cached rate and fetches a new one.
    pub async fn refresh(&self) -> Result<ExchangeRate> {
        let _guard = self.lock.lock().await;
        debug!("Refreshing exchange rate, bypassing cache");
        self.fetch_and_store().await
    }

    fn cached(&self) -> Option<ExchangeRate> {
        let res: Result<Option<CacheEntry>> = (|| match self.backend.get(RATE_CACHE_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        })();

        match res {
            Ok(Some(entry)) if Utc::now() < entry.expires_at => {
                debug!("Cache HIT for exchange rate");
                Some(entry.value)
            }
            Ok(Some(_)) => {
                debug!("Cached exchange rate expired");
                None
            }
            Ok(None) => {
                debug!("Cache MISS for exchange rate");
                None
            }
            Err(e) => {
                debug!("Exchange rate cache read error: {}", e);
                None
            }
        }
    }

    async fn fetch_and_store(&self) -> Result<ExchangeRate> {
        let rate = self.inner.fetch_rate().await?;

        let res: Result<()> = (|| {
            let ttl = chrono::Duration::from_std(self.ttl)?;
            let entry = CacheEntry {
                value: rate,
                expires_at: Utc::now() + ttl,
            };
            self.backend
                .put(RATE_CACHE_KEY, &serde_json::to_vec(&entry)?)
        })();
        if let Err(e) = res {
            debug!("Exchange rate cache write error: {}", e);
        }
        Ok(rate)
    }
}

#[async_trait]
impl<T: ExchangeRateProvider> ExchangeRateProvider for CachingRateProvider<T> {
    async fn fetch_rate(&self) -> Result<ExchangeRate> {
        let _guard = self.lock.lock().await;
        if let Some(rate) = self.cached() {
            return Ok(rate);
        }
        self.fetch_and_store().await
    }
}
