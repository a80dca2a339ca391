//! Tests for memoisation, hit/miss accounting and session replacement

#[cfg(test)]
mod tests {
    use patterngen::PatternError;
    use patterngen::algorithm::cache::{
        CacheStats, CompositeKey, MemoCache, RenderCache, SessionFingerprint,
    };
    use patterngen::io::image::SourceImage;
    use patterngen::io::request::{ImageSource, SourceKey};
    use patterngen::raster::tint::new_surface;
    use std::sync::{Arc, LazyLock};

    static MOTIF: LazyLock<SourceKey> =
        LazyLock::new(|| ImageSource::from(SourceImage::filled(2, 2, [255; 4])).key());

    fn fingerprint(seed: f64) -> SessionFingerprint {
        SessionFingerprint::new(
            seed,
            vec!["#000".into(), "#fff".into()],
            vec![MOTIF.clone()],
        )
    }

    // Verifies a new cache starts with 0 hits and 0 misses
    // Verified by initializing the cache with non-zero counts
    #[test]
    fn test_cache_new() {
        let cache: MemoCache<u32, u32> = MemoCache::new();
        assert_eq!(cache.stats, CacheStats::default());
        assert!(cache.is_empty());
    }

    // Tests cache miss on first access and hit on second
    // Verified by removing the hit counter increment
    #[test]
    fn test_cache_miss_and_hit() {
        let mut cache = MemoCache::new();
        let mut computed = 0;

        let first = *cache
            .get_or_try_compute("a", || {
                computed += 1;
                Ok(5)
            })
            .expect("first");
        let second = *cache
            .get_or_try_compute("a", || {
                computed += 1;
                Ok(99)
            })
            .expect("second");

        assert_eq!((first, second), (5, 5));
        assert_eq!(computed, 1);
        assert_eq!(cache.stats, CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    // Tests failed computations are not stored and are retried
    // Verified by inserting a default value on error
    #[test]
    fn test_errors_not_cached() {
        let mut cache: MemoCache<u8, u8> = MemoCache::new();
        assert!(cache.get_or_try_compute(1, || Err(PatternError::EmptyInput)).is_err());
        assert!(cache.is_empty());

        assert_eq!(cache.get_or_try_compute(1, || Ok(3)).ok().copied(), Some(3));
        assert_eq!(cache.stats.misses, 2);
    }

    // Tests clearing drops entries and statistics
    // Verified by keeping the statistics across clear
    #[test]
    fn test_clear() {
        let mut cache = MemoCache::new();
        let _ = cache.get_or_try_compute(1, || Ok(1));
        let _ = cache.get_or_try_compute(1, || Ok(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats, CacheStats::default());
    }

    // Tests the same fingerprint keeps the session and its entries
    // Verified by clearing caches on every session start
    #[test]
    fn test_same_session_kept() {
        let mut cache = RenderCache::new();
        assert!(!cache.begin_session(fingerprint(0.5)));
        let background = new_surface(10, 10).map(Arc::new);
        let _ = cache.backgrounds.get_or_try_compute((10, 10), || background);

        assert!(!cache.begin_session(fingerprint(0.5)));
        assert_eq!(cache.backgrounds.len(), 1);
        assert_eq!(cache.fingerprint(), Some(&fingerprint(0.5)));
    }

    // Tests a different fingerprint replaces both caches entirely
    // Verified by clearing only the background cache
    #[test]
    fn test_new_session_replaces_caches() {
        let mut cache = RenderCache::new();
        cache.begin_session(fingerprint(0.5));
        let _ = cache.composited.get_or_try_compute(
            CompositeKey {
                output_key: "10x10".into(),
                overlay: "default".into(),
                covers: vec![],
                font: None,
            },
            || Ok(Arc::new(vec![1, 2, 3])),
        );
        assert_eq!(cache.composited.len(), 1);

        assert!(cache.begin_session(fingerprint(0.25)));
        assert!(cache.composited.is_empty());
        assert!(cache.backgrounds.is_empty());
        assert_eq!(cache.composited.stats, CacheStats::default());
    }

    // Tests equal pixels in a different buffer start a new session
    // Verified by fingerprinting motifs by content
    #[test]
    fn test_motif_identity_replaces_session() {
        let twin = ImageSource::from(SourceImage::filled(2, 2, [255; 4])).key();
        let mut cache = RenderCache::new();
        cache.begin_session(fingerprint(0.5));

        let other = SessionFingerprint::new(0.5, vec!["#000".into(), "#fff".into()], vec![twin]);
        assert_ne!(fingerprint(0.5), other);
        assert!(cache.begin_session(other));
    }
}
