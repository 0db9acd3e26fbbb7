//! Bounded geocode cache
//!
//! Addresses are keyed by the SHA-256 of their text, coordinates never
//! expire, and the least recently used entry is evicted once `capacity` is
//! reached.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use shared::models::Coordinates;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Cache key for an address: hex SHA-256 of the trimmed text
pub fn cache_key(address: &str) -> String {
    hex::encode(Sha256::digest(address.trim().as_bytes()))
}

struct Entry {
    point: Coordinates,
    last_used: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// last_used tick → key, oldest first
    recency: BTreeMap<u64, String>,
    tick: u64,
}

impl Inner {
    fn touch(&mut self, key: &str) -> Option<Coordinates> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.last_used);
        entry.last_used = tick;
        self.recency.insert(tick, key.to_string());
        Some(entry.point)
    }
}

/// Process-wide geocode cache, cheap to clone
#[derive(Clone)]
pub struct GeoCache {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl GeoCache {
    /// `capacity == 0` disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<Coordinates> {
        self.inner.lock().touch(key)
    }

    pub fn insert(&self, key: String, point: Coordinates) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.touch(&key).is_some() {
            if let Some(entry) = inner.entries.get_mut(&key) {
                entry.point = point;
            }
            return;
        }

        while inner.entries.len() >= self.capacity {
            let Some((_, oldest)) = inner.recency.pop_first() else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        inner.tick += 1;
        let tick = inner.tick;
        inner.recency.insert(tick, key.clone());
        inner.entries.insert(
            key,
            Entry {
                point,
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
