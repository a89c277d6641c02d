use crate::analysis::profile::ColorProfile;
use crate::io::error::Result;
use std::collections::HashMap;

/// Key for caching color profiles
///
/// A profile depends on the source image and on the thumbnail resolution it
/// was sampled at.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProfileKey {
    source_id: String,
    resolution: u32,
}

impl ProfileKey {
    /// Create a key for a source sampled at `resolution`
    pub fn new(source_id: impl Into<String>, resolution: u32) -> Self {
        Self {
            source_id: source_id.into(),
            resolution,
        }
    }

    /// Identifier of the source image
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Thumbnail resolution the profile was sampled at
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }
}

/// Memoization cache for color profiles, scoped to a single generation run
///
/// Owned by the run and passed by reference, so independent runs never share
/// entries.
#[derive(Default)]
pub struct ProfileCache {
    profiles: HashMap<ProfileKey, ColorProfile>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl ProfileCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the cached profile or compute and store a new one
    ///
    /// The closure runs only on a miss. A failed computation is not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute_fn`
    pub fn get_or_compute<F>(&mut self, key: ProfileKey, compute_fn: F) -> Result<ColorProfile>
    where
        F: FnOnce() -> Result<ColorProfile>,
    {
        use std::collections::hash_map::Entry;

        match self.profiles.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(*entry.get())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let profile = compute_fn()?;
                Ok(*entry.insert(profile))
            }
        }
    }

    /// Number of cached profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the cache holds no profiles
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
