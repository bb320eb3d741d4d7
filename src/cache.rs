//! Time-boxed memoization of the day's loaded tables.
//!
//! One entry at a time, keyed by the civil date string. An entry is served
//! while its key matches and it is younger than the TTL; [`TableCache::invalidate`]
//! drops it on an operator reload.

use crate::schema::LoadedTables;
use log::debug;
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    loaded_at: Instant,
    tables: LoadedTables,
}

#[derive(Debug, Clone)]
pub struct TableCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<&LoadedTables> {
        self.get_at(key, Instant::now())
    }

    /// Lookup as of `now`; entries from the future count as fresh.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<&LoadedTables> {
        let entry = self.entry.as_ref()?;
        if entry.key != key {
            debug!("Cache miss: cached day {} != {}", entry.key, key);
            return None;
        }

        let age = now.saturating_duration_since(entry.loaded_at);
        if age >= self.ttl {
            debug!("Cache miss: entry for {} expired after {:?}", key, age);
            return None;
        }

        Some(&entry.tables)
    }

    pub fn insert(&mut self, key: impl Into<String>, tables: LoadedTables) -> &LoadedTables {
        self.insert_at(key, tables, Instant::now())
    }

    pub fn insert_at(
        &mut self,
        key: impl Into<String>,
        tables: LoadedTables,
        loaded_at: Instant,
    ) -> &LoadedTables {
        let entry = self.entry.insert(CacheEntry {
            key: key.into(),
            loaded_at,
            tables,
        });
        &entry.tables
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Cache invalidated");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
