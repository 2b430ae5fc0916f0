//! Decorator restricting searches to a subset of entries

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::{BiomeId, BiomeMix, Catalog, CatalogError, EntryId, LayerPair};
use crate::color::Argb;

use super::{Matcher, PaletteMatcher, Shade};

/// Searches a catalog restricted to an allowed set of entries.
///
/// The restricted catalog is rebuilt from the source matcher's catalog, so
/// its layer table only pairs allowed entries. Biomes are not restricted.
/// [`color_of`](Matcher::color_of) still answers for every entry of the
/// source catalog, since callers often need the color of an entry that was
/// placed before the restriction. Both searches and colors use the source
/// matcher's biome context.
#[derive(Debug, Clone)]
pub struct FilteringMatcher {
    full: PaletteMatcher,
    base: PaletteMatcher,
}

impl FilteringMatcher {
    /// Restrict `source`'s catalog to the ids in `allowed`.
    ///
    /// Ids the catalog does not know are ignored. Grass-like entries keep
    /// the biome context of `source`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyCatalog`] if no catalog entry is allowed.
    pub fn new<M, I>(source: &M, allowed: I) -> Result<Self, CatalogError>
    where
        M: Matcher + ?Sized,
        I: IntoIterator<Item = EntryId>,
    {
        let full = Arc::clone(source.catalog());
        let allowed: HashSet<EntryId> = allowed.into_iter().collect();
        let restricted = Arc::new(full.restrict(&allowed)?);
        let biome = source.biome();
        Ok(Self {
            full: PaletteMatcher::with_biome(full, biome)?,
            base: PaletteMatcher::with_biome(restricted, biome)?,
        })
    }

    /// Keep the source's valid entries for which `keep` returns true.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyCatalog`] if `keep` rejects every entry.
    pub fn from_mask<M, F>(source: &M, mut keep: F) -> Result<Self, CatalogError>
    where
        M: Matcher + ?Sized,
        F: FnMut(EntryId) -> bool,
    {
        let allowed: Vec<EntryId> = source
            .all_valid_entry_ids()
            .into_iter()
            .filter(|&id| keep(id))
            .collect();
        Self::new(source, allowed)
    }

    /// Keep only the entries that occur in `occupied`, such as the cells of
    /// an existing grid. Repeated ids are fine.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyCatalog`] if none of the ids are in the catalog.
    pub fn from_occupied<M, I>(source: &M, occupied: I) -> Result<Self, CatalogError>
    where
        M: Matcher + ?Sized,
        I: IntoIterator<Item = EntryId>,
    {
        Self::new(source, occupied)
    }

    /// Use `biome` as the context for grass-like entries instead of the
    /// source's.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownBiome`] if `biome` is not a valid biome.
    pub fn with_biome(self, biome: Option<BiomeId>) -> Result<Self, CatalogError> {
        Ok(Self {
            full: PaletteMatcher::with_biome(Arc::clone(self.full.catalog()), biome)?,
            base: PaletteMatcher::with_biome(Arc::clone(self.base.catalog()), biome)?,
        })
    }

    /// The restricted catalog searches run over.
    pub fn restricted(&self) -> &Arc<Catalog> {
        self.base.catalog()
    }
}

impl Matcher for FilteringMatcher {
    fn catalog(&self) -> &Arc<Catalog> {
        self.base.catalog()
    }

    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError> {
        self.full.color_of(entry)
    }

    fn biome(&self) -> Option<BiomeId> {
        self.base.biome()
    }

    fn nearest(&mut self, color: Argb) -> Option<EntryId> {
        self.base.find_nearest(color)
    }

    fn next_nearest(&mut self, color: Argb) -> Option<EntryId> {
        self.base.find_next_nearest(color)
    }

    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId> {
        self.base.find_shade(color, shade)
    }

    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair> {
        self.base.find_layer_pair(color)
    }

    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId> {
        self.base.find_biome(color)
    }

    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix> {
        self.base.find_biome_mix(color)
    }

    fn fork(&self) -> Box<dyn Matcher> {
        Box::new(self.clone())
    }
}
