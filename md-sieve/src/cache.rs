//! Allow-list memo and render cache
//!
//! Two in-process caches live here:
//!
//! - [`AllowListCache`] memoizes effective allow-lists per (parser, theme). Merging is
//!   deterministic, so two callers racing on the same key compute equal values and the loser's
//!   work is merely wasted.
//! - [`RenderCache`] stores sanitized HTML keyed by a digest of (parser, theme, markdown). It
//!   holds at most `max_entries` renderings and evicts the oldest insertion first. Entries record the [`Compression`] they were written with. Reading a gzip entry in a build
//!   without the `gzip` feature is an explicit [`SieveError::DecompressionUnavailable`], never a
//!   substitute string.

use crate::allowlist::AllowList;
use crate::error::{Result, SieveError};
use crate::provider::{ParserId, ThemeId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Compression applied to a cached payload, decided when the entry is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    /// Whether this build can encode and decode the compression
    pub fn is_available(self) -> bool {
        match self {
            Compression::None => true,
            Compression::Gzip => cfg!(feature = "gzip"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cached payload and the compression it was written with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    compression: Compression,
    payload: Vec<u8>,
}

impl CacheEntry {
    /// Wrap an already encoded payload (e.g. one read back from external storage)
    pub fn new(compression: Compression, payload: Vec<u8>) -> Self {
        Self {
            compression,
            payload,
        }
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Encode `html` with the requested compression
///
/// When the compression is not available in this build the entry is stored uncompressed; the
/// entry records what was actually used.
pub fn encode_entry(html: &str, requested: Compression) -> Result<CacheEntry> {
    let compression = if requested.is_available() {
        requested
    } else {
        tracing::warn!(
            compression = %requested,
            "Compression not available, caching uncompressed"
        );
        Compression::None
    };

    let payload = match compression {
        Compression::None => html.as_bytes().to_vec(),
        Compression::Gzip => gzip::compress(html.as_bytes())?,
    };
    Ok(CacheEntry::new(compression, payload))
}

/// Decode an entry back to HTML
pub fn decode_entry(entry: &CacheEntry) -> Result<String> {
    let bytes = match entry.compression {
        Compression::None => entry.payload.clone(),
        Compression::Gzip => gzip::decompress(&entry.payload)?,
    };
    String::from_utf8(bytes)
        .map_err(|e| SieveError::CorruptCacheEntry(format!("payload is not UTF-8: {e}")))
}

#[cfg(feature = "gzip")]
mod gzip {
    use crate::error::{Result, SieveError};
    use flate2::read::GzDecoder;
    use flate2::write::GzEncoder;
    use std::io::{Read, Write};

    pub(super) fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(bytes)
            .map_err(|e| SieveError::CorruptCacheEntry(format!("gzip encoding failed: {e}")))?;
        encoder
            .finish()
            .map_err(|e| SieveError::CorruptCacheEntry(format!("gzip encoding failed: {e}")))
    }

    pub(super) fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .map_err(|e| SieveError::CorruptCacheEntry(format!("gzip decoding failed: {e}")))?;
        Ok(decoded)
    }
}

#[cfg(not(feature = "gzip"))]
mod gzip {
    use super::Compression;
    use crate::error::{Result, SieveError};

    pub(super) fn compress(_bytes: &[u8]) -> Result<Vec<u8>> {
        Err(SieveError::DecompressionUnavailable {
            compression: Compression::Gzip,
        })
    }

    pub(super) fn decompress(_bytes: &[u8]) -> Result<Vec<u8>> {
        Err(SieveError::DecompressionUnavailable {
            compression: Compression::Gzip,
        })
    }
}

type AllowListKey = (ParserId, Option<ThemeId>);

/// Memo of effective allow-lists per (parser, theme)
#[derive(Debug, Default)]
pub struct AllowListCache {
    entries: RwLock<HashMap<AllowListKey, Arc<AllowList>>>,
}

impl AllowListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list for the key, computing and storing it on a miss
    pub fn get_or_compute<F>(
        &self,
        parser: &ParserId,
        theme: Option<&ThemeId>,
        compute: F,
    ) -> Arc<AllowList>
    where
        F: FnOnce() -> AllowList,
    {
        let key = (parser.clone(), theme.cloned());
        if let Some(list) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(%parser, "Allow-list served from cache");
            return Arc::clone(list);
        }

        // computed outside the lock; a concurrent computation yields an equal value
        let list = Arc::new(compute());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(list)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Renderings a [`RenderCache`] keeps unless told otherwise
pub const DEFAULT_RENDER_CACHE_ENTRIES: usize = 1024;

#[derive(Debug, Default)]
struct RenderEntries {
    map: HashMap<String, CacheEntry>,
    /// Keys in insertion order, oldest first
    order: VecDeque<String>,
}

/// Sanitized HTML keyed by (parser, theme, markdown), bounded by entry count
#[derive(Debug)]
pub struct RenderCache {
    compression: Compression,
    max_entries: usize,
    entries: RwLock<RenderEntries>,
}

impl RenderCache {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            max_entries: DEFAULT_RENDER_CACHE_ENTRIES,
            entries: RwLock::new(RenderEntries::default()),
        }
    }

    /// Keep at most `max_entries` renderings (at least one)
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// SHA-256 hex digest identifying a rendering
    pub fn key(parser: &ParserId, theme: Option<&ThemeId>, markdown: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(parser.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(theme.map(ThemeId::as_str).unwrap_or("").as_bytes());
        hasher.update([0]);
        hasher.update(markdown.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Decoded HTML for `key`, if cached
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.map.get(key).map(decode_entry).transpose()
    }

    /// Encode and store `html` under `key`
    pub fn insert(&self, key: impl Into<String>, html: &str) -> Result<()> {
        let entry = encode_entry(html, self.compression)?;
        self.insert_entry(key, entry);
        Ok(())
    }

    /// Store an already encoded entry, evicting the oldest ones past the bound
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert_entry(&self, key: impl Into<String>, entry: CacheEntry) {
        let key = key.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.map.insert(key.clone(), entry).is_none() {
            entries.order.push_back(key);
        }

        while entries.map.len() > self.max_entries {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.map.remove(&oldest);
            tracing::debug!(key = %oldest, "Evicted render cache entry");
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.map.clear();
        entries.order.clear();
    }
}
