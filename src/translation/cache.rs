/*!
 * Persistent translation cache.
 *
 * Maps trimmed source fragments to their translations so each unique fragment
 * costs at most one service call per run, and none at all across runs. The
 * mapping is loaded from a JSON file at job start and flushed back on normal
 * completion, on fatal quota errors, and on interruption.
 */

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::errors::CacheError;

/// Shared handle over the in-memory translation mapping.
///
/// Cloning the cache shares the underlying storage, so the orchestrator and
/// its workers all observe the same entries. Mutation is serialized by the
/// inner lock; `flush` snapshots under a read lock and never blocks writers
/// for the duration of the disk write.
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl TranslationCache {
    /// Create an empty in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load the cache from a JSON file.
    ///
    /// A missing file yields an empty cache. An unreadable or malformed file
    /// is fatal: silently discarding a prior run's translations would redo
    /// paid work without telling anyone.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            debug!("No cache file at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| CacheError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded {} cached translations from {:?}", entries.len(), path);
        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Look up a translation by trimmed source text.
    pub fn get(&self, source_text: &str) -> Option<String> {
        self.entries.read().get(source_text.trim()).cloned()
    }

    /// Store a fully resolved translation. Later writes for the same key
    /// overwrite earlier ones.
    pub fn put(&self, source_text: &str, translation: &str) {
        self.entries
            .write()
            .insert(source_text.trim().to_string(), translation.to_string());
    }

    /// Atomically persist the full current mapping, overwriting any prior
    /// snapshot.
    ///
    /// The mapping is snapshotted first, serialized as pretty-printed JSON
    /// with non-ASCII characters preserved, written to a sibling temp file,
    /// and renamed over the target so a crash mid-flush never leaves a
    /// half-written cache behind.
    pub fn flush(&self, path: &Path) -> Result<(), CacheError> {
        let snapshot = self.entries.read().clone();

        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| {
            CacheError::FlushFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new_in("."),
        }
        .map_err(|e| CacheError::FlushFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| CacheError::FlushFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        tmp.persist(path).map_err(|e| CacheError::FlushFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!("Flushed {} translations to {:?}", snapshot.len(), path);
        Ok(())
    }

    /// Number of cached translations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no translations.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
