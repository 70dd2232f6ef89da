use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::models::location::round_coordinates;

const KEY_PRECISION: u32 = 4;

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
    last_used: u64,
}

struct Inner<T> {
    entries: HashMap<String, StoredEntry<T>>,
    tick: u64,
}

/// In-memory cache with a time-to-live and least-recently-used eviction.
///
/// Nothing is persisted; a fresh process starts empty.
pub struct Cache<T> {
    inner: Mutex<Inner<T>>,
    capacity: usize,
    ttl: Duration,
}

/// Key for historical archive data of one location and date window
#[must_use]
pub fn history_key(latitude: f64, longitude: f64, start: chrono::NaiveDate, end: chrono::NaiveDate) -> String {
    let (latitude, longitude) = round_coordinates(latitude, longitude, KEY_PRECISION);
    format!("history:{latitude:.4}:{longitude:.4}:{start}:{end}")
}

/// Key for the immediate forecast of one location
#[must_use]
pub fn forecast_key(latitude: f64, longitude: f64) -> String {
    let (latitude, longitude) = round_coordinates(latitude, longitude, KEY_PRECISION);
    format!("forecast:{latitude:.4}:{longitude:.4}")
}

impl<T: Clone> Cache<T> {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Stores a value, evicting the least recently used entry when full.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put(&self, key: &str, value: T) {
        let mut inner = self.inner.lock().await;
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(key) && inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("Evicting {}", oldest);
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: Instant::now() + self.ttl,
                last_used: tick,
            },
        );
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get(&self, key: &str) -> Option<T> {
        let mut inner = self.inner.lock().await;
        inner.tick += 1;
        let tick = inner.tick;

        let fresh = match inner.entries.get_mut(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                entry.last_used = tick;
                Some(entry.value.clone())
            }
            Some(_) => None,
            None => {
                tracing::debug!("Key not found");
                return None;
            }
        };

        if fresh.is_some() {
            tracing::debug!("Key found and still fresh");
        } else {
            tracing::debug!("Key found but expired");
            inner.entries.remove(key);
        }
        fresh
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) {
        self.inner.lock().await.entries.remove(key);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
