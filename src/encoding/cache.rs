//! Encoded-payload cache.
//!
//! Maps a payload identity to its wire form. Values are pure functions of
//! their keys, so entries never go stale and concurrent writers racing on the
//! same key store identical values. A miss only costs a recomputation.
//!
//! The cache is an explicit object: share one `Arc<EncodingCache>` between
//! encoders to reuse encodings across messages and concurrent sends.

use bytes::Bytes;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Identity of a cached payload.
///
/// In-memory payloads are keyed by a SHA-256 digest of their content, tagged
/// by kind so the same text used as HTML and as PGP stays distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A file attachment, keyed by its path.
    File(PathBuf),
    /// Raw bytes.
    Bytes([u8; 32]),
    /// Inline HTML.
    Html([u8; 32]),
    /// PGP armored text.
    Pgp([u8; 32]),
}

impl CacheKey {
    /// Key for a file path.
    pub fn file(path: &Path) -> Self {
        CacheKey::File(path.to_path_buf())
    }

    /// Key for in-memory bytes.
    pub fn bytes(data: &[u8]) -> Self {
        CacheKey::Bytes(digest(data))
    }

    /// Key for HTML text.
    pub fn html(text: &str) -> Self {
        CacheKey::Html(digest(text.as_bytes()))
    }

    /// Key for PGP text.
    pub fn pgp(text: &str) -> Self {
        CacheKey::Pgp(digest(text.as_bytes()))
    }

    /// Short name of the key kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::File(_) => "file",
            CacheKey::Bytes(_) => "bytes",
            CacheKey::Html(_) => "html",
            CacheKey::Pgp(_) => "pgp",
        }
    }
}

fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

enum Entries {
    Unbounded(HashMap<CacheKey, Bytes>),
    Bounded(LruCache<CacheKey, Bytes>),
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that required encoding.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
}

/// Thread-safe store of encoded payloads.
pub struct EncodingCache {
    entries: Mutex<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EncodingCache {
    /// Creates a cache that keeps every entry.
    pub fn unbounded() -> Self {
        Self::from_entries(Entries::Unbounded(HashMap::new()))
    }

    /// Creates a cache that evicts the least recently used entry beyond `capacity`.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::from_entries(Entries::Bounded(LruCache::new(capacity)))
    }

    fn from_entries(entries: Entries) -> Self {
        Self {
            entries: Mutex::new(entries),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave a half-written value, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Looks up an encoded payload.
    pub fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let found = match &mut *self.lock() {
            Entries::Unbounded(map) => map.get(key).cloned(),
            Entries::Bounded(lru) => lru.get(key).cloned(),
        };
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(kind = key.kind(), "encoding cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(kind = key.kind(), "encoding cache miss");
        }
        found
    }

    /// Stores an encoded payload, replacing any previous value.
    pub fn insert(&self, key: CacheKey, value: Bytes) {
        match &mut *self.lock() {
            Entries::Unbounded(map) => {
                map.insert(key, value);
            }
            Entries::Bounded(lru) => {
                lru.put(key, value);
            }
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        match &*self.lock() {
            Entries::Unbounded(map) => map.len(),
            Entries::Bounded(lru) => lru.len(),
        }
    }

    /// Reports whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        match &mut *self.lock() {
            Entries::Unbounded(map) => map.clear(),
            Entries::Bounded(lru) => lru.clear(),
        }
    }

    /// Returns the current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for EncodingCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl std::fmt::Debug for EncodingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodingCache")
            .field("stats", &self.stats())
            .finish()
    }
}
