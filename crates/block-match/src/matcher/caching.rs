//! Memoizing decorator

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{BiomeId, BiomeMix, Catalog, CatalogError, EntryId, LayerPair};
use crate::color::Argb;

use super::{Matcher, Shade};

/// Per-kind result caches. Absence is cached as `None`.
#[derive(Debug, Default, Clone)]
struct MatchCache {
    nearest: HashMap<Argb, Option<EntryId>>,
    next_nearest: HashMap<Argb, Option<EntryId>>,
    lighter: HashMap<Argb, Option<EntryId>>,
    darker: HashMap<Argb, Option<EntryId>>,
    layer_pairs: HashMap<Argb, Option<LayerPair>>,
    biomes: HashMap<Argb, Option<BiomeId>>,
    biome_mixes: HashMap<Argb, Option<BiomeMix>>,
}

impl MatchCache {
    fn len(&self) -> usize {
        self.nearest.len()
            + self.next_nearest.len()
            + self.lighter.len()
            + self.darker.len()
            + self.layer_pairs.len()
            + self.biomes.len()
            + self.biome_mixes.len()
    }
}

/// Caches every lookup of the wrapped matcher by input color.
///
/// Results are exactly those of the wrapped matcher; the catalog is
/// immutable, so a cached answer never goes stale. Caches grow for the
/// lifetime of the instance and are never evicted.
///
/// Not meant for shared use: call [`fork`](Matcher::fork) to give each
/// worker its own caches.
pub struct CachingMatcher {
    inner: Box<dyn Matcher>,
    cache: MatchCache,
}

impl CachingMatcher {
    pub fn new(inner: Box<dyn Matcher>) -> Self {
        Self {
            inner,
            cache: MatchCache::default(),
        }
    }

    /// Number of cached results across all lookup kinds.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn into_inner(self) -> Box<dyn Matcher> {
        self.inner
    }
}

impl Matcher for CachingMatcher {
    fn catalog(&self) -> &Arc<Catalog> {
        self.inner.catalog()
    }

    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError> {
        self.inner.color_of(entry)
    }

    fn biome(&self) -> Option<BiomeId> {
        self.inner.biome()
    }

    fn nearest(&mut self, color: Argb) -> Option<EntryId> {
        let inner = &mut self.inner;
        *self
            .cache
            .nearest
            .entry(color)
            .or_insert_with(|| inner.nearest(color))
    }

    fn next_nearest(&mut self, color: Argb) -> Option<EntryId> {
        let inner = &mut self.inner;
        *self
            .cache
            .next_nearest
            .entry(color)
            .or_insert_with(|| inner.next_nearest(color))
    }

    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId> {
        let map = match shade {
            Shade::Lighter => &mut self.cache.lighter,
            Shade::Darker => &mut self.cache.darker,
        };
        let inner = &mut self.inner;
        *map.entry(color).or_insert_with(|| inner.nearest_shade(color, shade))
    }

    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair> {
        let inner = &mut self.inner;
        *self
            .cache
            .layer_pairs
            .entry(color)
            .or_insert_with(|| inner.nearest_layer_pair(color))
    }

    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId> {
        let inner = &mut self.inner;
        *self
            .cache
            .biomes
            .entry(color)
            .or_insert_with(|| inner.nearest_biome(color))
    }

    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix> {
        let inner = &mut self.inner;
        *self
            .cache
            .biome_mixes
            .entry(color)
            .or_insert_with(|| inner.nearest_biome_mix(color))
    }

    fn fork(&self) -> Box<dyn Matcher> {
        Box::new(CachingMatcher::new(self.inner.fork()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BiomeSpec, EntrySpec};
    use crate::matcher::PaletteMatcher;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn base() -> PaletteMatcher {
        let catalog = Catalog::build(
            vec![
                EntrySpec::new(0, Argb(0xFF000000)),
                EntrySpec::new(1, Argb(0xFF7F3F1F)),
                EntrySpec::new(2, Argb(0xFF3F7F1F)),
                EntrySpec::new(3, Argb(0xFFFFFFFF)),
                EntrySpec::new(4, Argb(0x80202080)),
            ],
            vec![
                BiomeSpec::new(0, "plains", Argb(0xFF91BD59)),
                BiomeSpec::new(1, "taiga", Argb(0xFF86B783)),
            ],
            Argb::WHITE,
        )
        .unwrap();
        PaletteMatcher::new(Arc::new(catalog))
    }

    #[test]
    fn test_cache_matches_wrapped_results() {
        let direct = base();
        let mut cached = CachingMatcher::new(Box::new(direct.clone()));
        let mut rng = StdRng::seed_from_u64(9);

        let colors: Vec<Argb> = (0..200)
            .map(|_| Argb(rng.gen::<u32>() | 0xFF00_0000))
            .collect();
        // each color twice, so the second pass is served from the cache
        for _ in 0..2 {
            for &c in &colors {
                assert_eq!(cached.nearest(c), direct.find_nearest(c));
                assert_eq!(cached.next_nearest(c), direct.find_next_nearest(c));
                assert_eq!(cached.lighter(c), direct.find_shade(c, Shade::Lighter));
                assert_eq!(cached.darker(c), direct.find_shade(c, Shade::Darker));
                assert_eq!(cached.nearest_layer_pair(c), direct.find_layer_pair(c));
                assert_eq!(cached.nearest_biome(c), direct.find_biome(c));
                assert_eq!(cached.nearest_biome_mix(c), direct.find_biome_mix(c));
            }
        }
    }

    #[test]
    fn test_absence_is_cached() {
        let mut cached = CachingMatcher::new(Box::new(base()));
        assert_eq!(cached.nearest(Argb(0x00000000)), None);
        assert_eq!(cached.cached_len(), 1);
        assert_eq!(cached.nearest(Argb(0x00000000)), None);
        assert_eq!(cached.cached_len(), 1);
    }

    #[test]
    fn test_shades_cached_separately() {
        let mut cached = CachingMatcher::new(Box::new(base()));
        let c = Argb(0xFF7F7F7F);
        let lighter = cached.lighter(c);
        let darker = cached.darker(c);
        assert_ne!(lighter, darker);
        assert_eq!(cached.cached_len(), 2);
    }

    #[test]
    fn test_fork_starts_empty() {
        let mut cached = CachingMatcher::new(Box::new(base()));
        cached.nearest(Argb(0xFF101010));
        assert_eq!(cached.cached_len(), 1);

        let mut forked = cached.fork();
        assert_eq!(forked.nearest(Argb(0xFF101010)), Some(0));
        assert_eq!(cached.cached_len(), 1);
        assert!(Arc::ptr_eq(forked.catalog(), cached.catalog()));
    }
}
