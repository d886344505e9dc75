//! Content encoding for attachment payloads.
//!
//! Every payload is turned into the exact bytes placed on the wire:
//! bytes, files and HTML become line-wrapped base64, PGP text passes
//! through unchanged. Each encoder consults the shared [`EncodingCache`]
//! first and stores what it computed on a miss.

pub mod base64;
pub mod cache;

pub use cache::{CacheKey, CacheStats, EncodingCache};

use crate::config::{Config, DEFAULT_LINE_LENGTH};
use crate::error::{Error, Result};
use crate::message::Payload;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Encodes attachment payloads, memoizing results in a shared cache.
///
/// Clones share the same cache.
#[derive(Debug, Clone)]
pub struct ContentEncoder {
    cache: Arc<EncodingCache>,
    line_length: usize,
}

impl Default for ContentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentEncoder {
    /// Creates an encoder with a private unbounded cache and 76-character lines.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(EncodingCache::unbounded()))
    }

    /// Creates an encoder backed by an existing cache.
    pub fn with_cache(cache: Arc<EncodingCache>) -> Self {
        Self {
            cache,
            line_length: DEFAULT_LINE_LENGTH,
        }
    }

    /// Creates an encoder from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = match config.cache_bound() {
            Some(capacity) => EncodingCache::bounded(capacity),
            None => EncodingCache::unbounded(),
        };
        Ok(Self {
            cache: Arc::new(cache),
            line_length: config.line_length,
        })
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> &Arc<EncodingCache> {
        &self.cache
    }

    /// Returns the base64 line length.
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    /// Encodes a payload according to its kind.
    pub async fn encode(&self, payload: &Payload) -> Result<Bytes> {
        match payload {
            Payload::Bytes(data) => Ok(self.encode_bytes(data)),
            Payload::Pgp(text) => Ok(self.encode_pgp(text)),
            Payload::File(path) => self.encode_file(path).await,
            Payload::Html(html) => Ok(self.encode_html(html)),
        }
    }

    /// Base64-encodes in-memory bytes.
    pub fn encode_bytes(&self, data: &[u8]) -> Bytes {
        self.cached(CacheKey::bytes(data), || self.wrap(data))
    }

    /// Base64-encodes HTML text.
    pub fn encode_html(&self, html: &str) -> Bytes {
        self.cached(CacheKey::html(html), || self.wrap(html.as_bytes()))
    }

    /// Returns PGP armored text unchanged.
    pub fn encode_pgp(&self, text: &str) -> Bytes {
        self.cached(CacheKey::pgp(text), || Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Reads a file fully and base64-encodes its contents.
    ///
    /// A missing file fails with [`Error::FileNotFound`] naming the path. The
    /// file handle is released as soon as its contents are read.
    pub async fn encode_file(&self, path: &Path) -> Result<Bytes> {
        let key = CacheKey::file(path);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let data = read_file(path).await?;
        tracing::debug!(path = %path.display(), size = data.len(), "read file attachment");
        let encoded = self.wrap(&data);
        self.cache.insert(key, encoded.clone());
        Ok(encoded)
    }

    fn cached(&self, key: CacheKey, encode: impl FnOnce() -> Bytes) -> Bytes {
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }
        let encoded = encode();
        self.cache.insert(key, encoded.clone());
        encoded
    }

    fn wrap(&self, data: &[u8]) -> Bytes {
        Bytes::from(self::base64::encode_wrapped(data, self.line_length))
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::file(path, e))?;
    let mut data = Vec::new();
    let read = file.read_to_end(&mut data).await;
    drop(file);
    read.map_err(|e| Error::file(path, e))?;
    Ok(data)
}
