//! Tests for run-scoped profile memoization

#[cfg(test)]
mod tests {
    use crate::{rgb, solid};
    use photomosaic::MosaicError;
    use photomosaic::analysis::cache::{ProfileCache, ProfileKey};
    use photomosaic::analysis::profile::{ColorProfile, extract_profile};
    use std::cell::Cell;

    // Tests that the profile is computed once per key and then served from cache
    // Verified by skipping the occupied-entry branch
    #[test]
    fn test_profile_computed_once_per_key() -> photomosaic::Result<()> {
        let thumbnail = solid(8, 8, [1, 2, 3, 255]);
        let calls = Cell::new(0);
        let mut cache = ProfileCache::new();

        for _ in 0..3 {
            let profile = cache.get_or_compute(ProfileKey::new("a.png", 64), || {
                calls.set(calls.get() + 1);
                extract_profile(&thumbnail)
            })?;
            assert_eq!(profile.mean, rgb(1, 2, 3));
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats.misses, 1);
        assert_eq!(cache.stats.hits, 2);
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    // Tests that resolution is part of the key
    // Verified by hashing only the source identifier
    #[test]
    fn test_resolution_distinguishes_keys() -> photomosaic::Result<()> {
        let mut cache = ProfileCache::new();
        let profile = ColorProfile {
            mean: rgb(9, 9, 9),
            variance: 0.0,
        };

        cache.get_or_compute(ProfileKey::new("a.png", 64), || Ok(profile))?;
        cache.get_or_compute(ProfileKey::new("a.png", 128), || Ok(profile))?;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats.misses, 2);

        let key = ProfileKey::new("a.png", 128);
        assert_eq!(key.source_id(), "a.png");
        assert_eq!(key.resolution(), 128);
        Ok(())
    }

    // Tests that a failed computation is not cached
    // Verified by inserting a default profile on failure
    #[test]
    fn test_failure_not_cached() {
        let mut cache = ProfileCache::new();
        let result = cache.get_or_compute(ProfileKey::new("bad.png", 32), || {
            Err(MosaicError::NoMaterials { attempted: 0 })
        });

        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
