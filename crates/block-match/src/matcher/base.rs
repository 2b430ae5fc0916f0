//! Linear-scan matcher over a catalog

use std::sync::Arc;

use crate::catalog::{BiomeId, BiomeMix, Catalog, CatalogError, EntryId, LayerPair};
use crate::color::{distance, intensity, Argb};

use super::{Matcher, Shade};

/// Index of the candidate nearest to `color` among those `accept` lets
/// through. Strict comparison keeps the first of equally distant candidates.
fn scan<F>(candidates: &[Argb], color: Argb, mut accept: F) -> Option<usize>
where
    F: FnMut(Argb) -> bool,
{
    let mut best: Option<(usize, u64)> = None;
    for (i, &candidate) in candidates.iter().enumerate() {
        if !accept(candidate) {
            continue;
        }
        let d = distance(color, candidate);
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Stateless matcher that scans the catalog on every lookup.
///
/// Grass-like entries are searched with the combined tint of the matcher's
/// biome, which defaults to the catalog's first valid biome. The recolored
/// table is computed once at construction.
///
/// Cloning is cheap and clones share the catalog. The inherent `find_*`
/// methods take `&self`, so one instance can also be shared between threads
/// without forking.
#[derive(Debug, Clone)]
pub struct PaletteMatcher {
    catalog: Arc<Catalog>,
    biome: Option<BiomeId>,
    colors: Arc<[Argb]>,
}

impl PaletteMatcher {
    /// Matcher using the catalog's default biome for grass-like entries.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let biome = catalog.default_biome();
        let colors = catalog.effective_colors(biome).into();
        Self {
            catalog,
            biome,
            colors,
        }
    }

    /// Matcher with an explicit biome context.
    ///
    /// `None` searches grass-like entries with their stored colors.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownBiome`] if `biome` is not a valid biome of the
    /// catalog.
    pub fn with_biome(catalog: Arc<Catalog>, biome: Option<BiomeId>) -> Result<Self, CatalogError> {
        if let Some(id) = biome {
            if !catalog.biome(id).is_some_and(|b| b.is_valid()) {
                return Err(CatalogError::UnknownBiome { id });
            }
        }
        let colors = catalog.effective_colors(biome).into();
        Ok(Self {
            catalog,
            biome,
            colors,
        })
    }

    /// Searchable colors after biome substitution, aligned with the
    /// catalog's valid entry ids.
    pub fn effective_colors(&self) -> &[Argb] {
        &self.colors
    }

    fn entry_at(&self, index: Option<usize>) -> Option<EntryId> {
        index.map(|i| self.catalog.valid_entry_ids()[i])
    }

    pub fn find_nearest(&self, color: Argb) -> Option<EntryId> {
        let alpha = color.alpha();
        self.entry_at(scan(&self.colors, color, |c| c.alpha() == alpha))
    }

    pub fn find_next_nearest(&self, color: Argb) -> Option<EntryId> {
        let alpha = color.alpha();
        self.entry_at(scan(&self.colors, color, |c| {
            c != color && c.alpha() == alpha
        }))
    }

    pub fn find_shade(&self, color: Argb, shade: Shade) -> Option<EntryId> {
        let alpha = color.alpha();
        let level = intensity(color);
        self.entry_at(scan(&self.colors, color, |c| {
            let on_side = match shade {
                Shade::Lighter => intensity(c) > level,
                Shade::Darker => intensity(c) < level,
            };
            on_side && c != color && c.alpha() == alpha
        }))
    }

    pub fn find_layer_pair(&self, color: Argb) -> Option<LayerPair> {
        let alpha = color.alpha();
        scan(self.catalog.layer_colors(), color, |c| c.alpha() == alpha)
            .map(|i| self.catalog.layer_pairs()[i])
    }

    pub fn find_biome(&self, color: Argb) -> Option<BiomeId> {
        let mut best: Option<(BiomeId, u64)> = None;
        for biome in self.catalog.valid_biomes() {
            let d = distance(color, biome.tint_combined);
            if best.map_or(true, |(_, min)| d < min) {
                best = Some((biome.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn find_biome_mix(&self, color: Argb) -> Option<BiomeMix> {
        let alpha = color.alpha();
        scan(self.catalog.mix_colors(), color, |c| c.alpha() == alpha)
            .and_then(|i| self.catalog.mix(i))
    }
}

impl Matcher for PaletteMatcher {
    fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError> {
        let stored = self.catalog.color_of(entry)?;
        if !self.catalog.is_grass_like(entry) {
            return Ok(stored);
        }
        Ok(self
            .biome
            .and_then(|id| self.catalog.biome(id))
            .map_or(stored, |b| b.tint_combined))
    }

    fn biome(&self) -> Option<BiomeId> {
        self.biome
    }

    fn nearest(&mut self, color: Argb) -> Option<EntryId> {
        self.find_nearest(color)
    }

    fn next_nearest(&mut self, color: Argb) -> Option<EntryId> {
        self.find_next_nearest(color)
    }

    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId> {
        self.find_shade(color, shade)
    }

    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair> {
        self.find_layer_pair(color)
    }

    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId> {
        self.find_biome(color)
    }

    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix> {
        self.find_biome_mix(color)
    }

    fn fork(&self) -> Box<dyn Matcher> {
        Box::new(self.clone())
    }
}
