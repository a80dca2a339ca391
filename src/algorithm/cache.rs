use crate::io::error::Result;
use crate::io::request::SourceKey;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

/// Memoizing map that computes a value only the first time its key is seen
///
/// Failed computations are not stored, so a later request retries them.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, V>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the cached value or compute and store it
    ///
    /// # Errors
    ///
    /// Returns the error of `compute_fn`; nothing is stored in that case
    pub fn get_or_try_compute<F>(&mut self, key: K, compute_fn: F) -> Result<&V>
    where
        F: FnOnce() -> Result<V>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                Ok(entry.insert(compute_fn()?))
            }
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

/// Identity of the inputs that determine the scattered background
///
/// Two requests with equal fingerprints produce identical master surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionFingerprint {
    seed_bits: u64,
    palette: Vec<String>,
    images: Vec<SourceKey>,
}

impl SessionFingerprint {
    /// Fingerprint from the seed, palette entries and motif identities
    pub const fn new(seed: f64, palette: Vec<String>, images: Vec<SourceKey>) -> Self {
        Self {
            seed_bits: seed.to_bits(),
            palette,
            images,
        }
    }
}

/// Key of a finished, encoded output
///
/// Together with `output_key`, the other fields capture everything besides
/// the background that changes the composited pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    /// Output key, including any variant suffix
    pub output_key: String,
    /// Overlay options rendered to a comparable string
    pub overlay: String,
    /// Cover identities
    pub covers: Vec<SourceKey>,
    /// Font identity
    pub font: Option<SourceKey>,
}

/// Background and composited caches of one render session
///
/// A new session fingerprint replaces both caches wholesale; requests that
/// only change overlay parameters keep their backgrounds.
#[derive(Debug, Default)]
pub struct RenderCache {
    fingerprint: Option<SessionFingerprint>,
    /// Cropped backgrounds by output dimensions
    pub backgrounds: MemoCache<(u32, u32), Arc<Pixmap>>,
    /// Encoded outputs by output key and overlay parameters
    pub composited: MemoCache<CompositeKey, Arc<Vec<u8>>>,
}

impl RenderCache {
    /// Create an empty cache with no session
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `fingerprint` the current session
    ///
    /// Returns `true` if the previous session was discarded.
    pub fn begin_session(&mut self, fingerprint: SessionFingerprint) -> bool {
        if self.fingerprint.as_ref() == Some(&fingerprint) {
            return false;
        }

        let replaced = self.fingerprint.is_some();
        if replaced {
            log::debug!(
                "Session changed, dropping {} backgrounds and {} outputs",
                self.backgrounds.len(),
                self.composited.len()
            );
        }
        self.backgrounds.clear();
        self.composited.clear();
        self.fingerprint = Some(fingerprint);
        replaced
    }

    /// Fingerprint of the current session
    pub const fn fingerprint(&self) -> Option<&SessionFingerprint> {
        self.fingerprint.as_ref()
    }
}
