//! MatcherBuilder: fluent assembly of a matcher chain.

use std::sync::Arc;

use crate::catalog::{BiomeId, Catalog, EntryId};
use crate::matcher::{
    CachingMatcher, DitherOptions, DitheringMatcher, FilteringMatcher, Matcher, PaletteMatcher,
};

use super::error::MatchError;

/// Builder for a [`Matcher`] chain over one catalog.
///
/// Layers are stacked in a fixed order, innermost first:
///
/// 1. [`PaletteMatcher`] with the chosen biome context
/// 2. [`FilteringMatcher`] if [`restrict_to`](Self::restrict_to) was called
/// 3. [`CachingMatcher`] unless caching was turned off
/// 4. [`DitheringMatcher`] if [`dither`](Self::dither) was called
///
/// Dithering sits outside the cache so its offset queries still benefit
/// from cached lookups.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use block_match::{Argb, Catalog, EntrySpec, Matcher, MatcherBuilder};
///
/// let catalog = Arc::new(
///     Catalog::build(
///         vec![
///             EntrySpec::new(1, Argb(0xFF000000)),
///             EntrySpec::new(2, Argb(0xFF808080)),
///             EntrySpec::new(3, Argb(0xFFFFFFFF)),
///         ],
///         Vec::new(),
///         Argb::WHITE,
///     )
///     .unwrap(),
/// );
///
/// let mut matcher = MatcherBuilder::new(catalog)
///     .restrict_to([1, 3])
///     .build()
///     .unwrap();
///
/// // the grey entry is excluded, dark grey goes to black
/// assert_eq!(matcher.nearest(Argb(0xFF707070)), Some(1));
/// assert_eq!(matcher.nearest(Argb(0xFF808080)), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct MatcherBuilder {
    catalog: Arc<Catalog>,
    biome: Option<Option<BiomeId>>,
    allowed: Option<Vec<EntryId>>,
    cached: bool,
    dither: Option<DitherOptions>,
}

impl MatcherBuilder {
    /// Start a chain over `catalog`. Caching is on by default.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            biome: None,
            allowed: None,
            cached: true,
            dither: None,
        }
    }

    /// Biome context for grass-like entries. `None` uses their stored
    /// colors. Without this call the catalog's default biome applies.
    #[inline]
    pub fn biome(mut self, biome: Option<BiomeId>) -> Self {
        self.biome = Some(biome);
        self
    }

    /// Only return entries from `ids`.
    #[inline]
    pub fn restrict_to<I: IntoIterator<Item = EntryId>>(mut self, ids: I) -> Self {
        self.allowed = Some(ids.into_iter().collect());
        self
    }

    #[inline]
    pub fn cached(mut self, enabled: bool) -> Self {
        self.cached = enabled;
        self
    }

    #[inline]
    pub fn dither(mut self, options: DitherOptions) -> Self {
        self.dither = Some(options);
        self
    }

    /// Assemble the chain.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownBiome`](crate::CatalogError::UnknownBiome)
    ///   for a biome that is missing or not valid
    /// - [`CatalogError::EmptyCatalog`](crate::CatalogError::EmptyCatalog)
    ///   if the restriction leaves no entries
    pub fn build(&self) -> Result<Box<dyn Matcher>, MatchError> {
        let base = match self.biome {
            Some(biome) => PaletteMatcher::with_biome(Arc::clone(&self.catalog), biome)?,
            None => PaletteMatcher::new(Arc::clone(&self.catalog)),
        };

        let mut matcher: Box<dyn Matcher> = match &self.allowed {
            Some(ids) => Box::new(FilteringMatcher::new(&base, ids.iter().copied())?),
            None => Box::new(base),
        };

        if self.cached {
            matcher = Box::new(CachingMatcher::new(matcher));
        }
        if let Some(options) = self.dither {
            matcher = Box::new(DitheringMatcher::new(matcher, options));
        }
        Ok(matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BiomeSpec, CatalogError, EntrySpec};
    use crate::color::Argb;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::build(
                vec![
                    EntrySpec::new(0, Argb(0xFF000000)),
                    EntrySpec::grass(1, Argb(0xFF939393)),
                    EntrySpec::new(2, Argb(0xFFFFFFFF)),
                ],
                vec![BiomeSpec::new(0, "plains", Argb(0xFF91BD59))],
                Argb::WHITE,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_default_chain_matches_base() {
        let cat = catalog();
        let mut built = MatcherBuilder::new(Arc::clone(&cat)).build().unwrap();
        let base = PaletteMatcher::new(cat);
        for c in [0xFF000000, 0xFF91BD59, 0xFF939393, 0xFFEEEEEE] {
            assert_eq!(built.nearest(Argb(c)), base.find_nearest(Argb(c)));
        }
    }

    #[test]
    fn test_biome_context() {
        let mut plain = MatcherBuilder::new(catalog()).biome(None).build().unwrap();
        assert_eq!(plain.nearest(Argb(0xFF939393)), Some(1));
        assert_eq!(plain.color_of(1).unwrap(), Argb(0xFF939393));

        let Err(err) = MatcherBuilder::new(catalog()).biome(Some(9)).build() else {
            panic!("unknown biome should not build");
        };
        assert!(matches!(
            err,
            MatchError::Catalog(CatalogError::UnknownBiome { id: 9 })
        ));
    }

    #[test]
    fn test_restriction_errors() {
        let Err(err) = MatcherBuilder::new(catalog()).restrict_to([42]).build() else {
            panic!("empty restriction should not build");
        };
        assert!(matches!(err, MatchError::Catalog(CatalogError::EmptyCatalog)));
    }

    #[test]
    fn test_restriction_keeps_biome_context() {
        let plain = MatcherBuilder::new(catalog())
            .biome(None)
            .restrict_to([0, 1])
            .build()
            .unwrap();
        assert_eq!(plain.biome(), None);
        assert_eq!(plain.color_of(1).unwrap(), Argb(0xFF939393));

        let tinted = MatcherBuilder::new(catalog()).restrict_to([0, 2]).build().unwrap();
        assert_eq!(tinted.biome(), Some(0));
        assert_eq!(tinted.color_of(1).unwrap(), Argb(0xFF91BD59));
    }

    #[test]
    fn test_restricted_grey_goes_to_nearer_extreme() {
        let cat = Arc::new(
            Catalog::build(
                vec![
                    EntrySpec::new(1, Argb(0xFF000000)),
                    EntrySpec::new(2, Argb(0xFF808080)),
                    EntrySpec::new(3, Argb(0xFFFFFFFF)),
                ],
                Vec::new(),
                Argb::WHITE,
            )
            .unwrap(),
        );
        let mut m = MatcherBuilder::new(cat).restrict_to([1, 3]).build().unwrap();
        assert_eq!(m.nearest(Argb(0xFF707070)), Some(1));
        assert_eq!(m.nearest(Argb(0xFF808080)), Some(3));
    }

    #[test]
    fn test_dither_layer_outermost() {
        let mut m = MatcherBuilder::new(catalog())
            .biome(None)
            .restrict_to([0, 2])
            .dither(DitherOptions::default())
            .build()
            .unwrap();
        let grey = Argb(0xFF707070);
        let picks: Vec<_> = (0..4).map(|_| m.nearest(grey).unwrap()).collect();
        assert!(picks.contains(&0) && picks.contains(&2), "picks {picks:?}");
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = MatcherBuilder::new(catalog()).cached(false);
        let mut a = builder.build().unwrap();
        let mut b = builder.build().unwrap();
        assert_eq!(a.nearest(Argb::WHITE), b.nearest(Argb::WHITE));
    }
}
