//! Tests for batched material loading, timeouts and failure handling

#[cfg(test)]
mod tests {
    use crate::{png_bytes, quiet_control, rgb, solid};
    use photomosaic::MosaicError;
    use photomosaic::algorithm::control::{CancelToken, RunControl};
    use photomosaic::analysis::cache::ProfileCache;
    use photomosaic::io::loader::{
        MaterialLoader, decode_material, loading_batch_size, loading_pause,
    };
    use photomosaic::io::source::{MaterialSource, MemorySource};
    use std::sync::Arc;
    use std::time::Duration;

    struct SlowSource {
        delay: Duration,
    }

    impl MaterialSource for SlowSource {
        fn fetch(&self, _source_id: &str) -> photomosaic::Result<Vec<u8>> {
            std::thread::sleep(self.delay);
            png_bytes(&solid(4, 4, [0, 0, 0, 255]))
        }
    }

    fn sample_source() -> photomosaic::Result<MemorySource> {
        let mut source = MemorySource::new();
        source.insert("red", png_bytes(&solid(20, 10, [255, 0, 0, 255]))?);
        source.insert("green", png_bytes(&solid(10, 20, [0, 255, 0, 255]))?);
        source.insert("blue", png_bytes(&solid(12, 12, [0, 0, 255, 255]))?);
        source.insert("garbage", vec![0, 1, 2, 3]);
        Ok(source)
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    // Tests batch sizes and pauses scale with thumbnail resolution
    // Verified by inverting the resolution scaling
    #[test]
    fn test_batch_size_and_pause() {
        assert_eq!(loading_batch_size(16), 8);
        assert_eq!(loading_batch_size(128), 7);
        assert_eq!(loading_batch_size(512), 3);
        assert_eq!(loading_pause(16), Duration::from_millis(3));
        assert_eq!(loading_pause(512), Duration::from_millis(32));
    }

    // Tests a single material decodes with a square thumbnail
    // Verified by skipping normalization
    #[test]
    fn test_decode_material() -> photomosaic::Result<()> {
        let source = sample_source()?;
        let decoded = decode_material(&source, "red", 8)?;

        assert_eq!(decoded.source_id, "red");
        assert_eq!(decoded.image.dimensions(), (20, 10));
        assert_eq!(decoded.thumbnail.dimensions(), (8, 8));
        Ok(())
    }

    // Tests that failures are dropped while good materials keep their order
    // Verified by aborting the run on the first per-image failure
    #[test]
    fn test_failures_skipped_in_order() -> photomosaic::Result<()> {
        let loader = MaterialLoader::new(Arc::new(sample_source()?), 16);
        let mut cache = ProfileCache::new();

        let (catalog, summary) = loader.load_catalog(
            &ids(&["blue", "garbage", "red", "missing", "green"]),
            &mut cache,
            &quiet_control(),
        )?;

        assert_eq!(summary.attempted, 5);
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.failed, 2);
        let order: Vec<_> = catalog.iter().map(|m| m.source_id.as_str()).collect();
        assert_eq!(order, vec!["blue", "red", "green"]);
        assert_eq!(catalog.get(1).map(|m| m.mean_color()), Some(rgb(255, 0, 0)));
        assert_eq!(cache.stats.misses, 3);
        Ok(())
    }

    // Tests that a repeated source hits the profile cache
    // Verified by creating a fresh cache per batch
    #[test]
    fn test_repeated_source_uses_cache() -> photomosaic::Result<()> {
        let loader = MaterialLoader::new(Arc::new(sample_source()?), 16);
        let mut cache = ProfileCache::new();

        let (catalog, _) =
            loader.load_catalog(&ids(&["red", "red", "red"]), &mut cache, &quiet_control())?;

        assert_eq!(catalog.len(), 3);
        assert_eq!(cache.stats.misses, 1);
        assert_eq!(cache.stats.hits, 2);
        Ok(())
    }

    // Tests that slow loads time out individually
    // Verified by waiting without a deadline
    #[test]
    fn test_slow_load_times_out() {
        let loader = MaterialLoader::new(
            Arc::new(SlowSource {
                delay: Duration::from_millis(500),
            }),
            16,
        )
        .with_timeout(Duration::from_millis(20));
        assert_eq!(loader.timeout(), Duration::from_millis(20));

        let results = loader.load_batch(&ids(&["slow"]));
        assert!(matches!(
            results.first(),
            Some(Err(MosaicError::LoadTimeout { .. }))
        ));
    }

    // Tests the fatal error when nothing loads
    // Verified by returning an empty catalog
    #[test]
    fn test_nothing_loaded_is_fatal() -> photomosaic::Result<()> {
        let loader = MaterialLoader::new(Arc::new(sample_source()?), 16);
        let result = loader.load_catalog(
            &ids(&["garbage", "missing"]),
            &mut ProfileCache::new(),
            &quiet_control(),
        );

        assert!(matches!(
            result,
            Err(MosaicError::NoMaterials { attempted: 2 })
        ));
        Ok(())
    }

    // Tests that cancellation stops loading
    // Verified by checking cancellation only after the last batch
    #[test]
    fn test_cancelled_loading() -> photomosaic::Result<()> {
        let token = CancelToken::new();
        token.cancel();
        let loader = MaterialLoader::new(Arc::new(sample_source()?), 16);

        let result = loader.load_catalog(
            &ids(&["red"]),
            &mut ProfileCache::new(),
            &RunControl::unpaced(token),
        );
        assert!(matches!(result, Err(MosaicError::Cancelled { .. })));
        Ok(())
    }
}
