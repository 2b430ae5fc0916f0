//! Catalog construction and accessors

use std::collections::HashSet;
use std::sync::Arc;

use crate::color::Argb;

use super::biome::{Biome, BiomeMix, BiomeSpec};
use super::error::CatalogError;
use super::tables::{BiomeTable, LayerTable, MixTable};
use super::{BiomeId, EntryId, EntrySpec, LayerPair};

/// Precomputed, read-only search tables.
///
/// Shared between matchers as `Arc<Catalog>`.
///
/// # Example
///
/// ```
/// use block_match::catalog::{Catalog, EntrySpec};
/// use block_match::color::Argb;
///
/// let catalog = Catalog::build(
///     vec![
///         EntrySpec::new(1, Argb(0xFF000000)),
///         EntrySpec::new(2, Argb(0xFFFFFFFF)),
///     ],
///     Vec::new(),
///     Argb::WHITE,
/// )
/// .unwrap();
///
/// assert_eq!(catalog.valid_entry_ids(), &[1, 2]);
/// assert_eq!(catalog.color_of(2).unwrap(), Argb::WHITE);
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<EntrySpec>,
    valid_colors: Vec<Argb>,
    valid_entry_ids: Vec<EntryId>,
    entry_colors: Vec<Option<Argb>>,
    grass_like: Vec<bool>,
    layers: LayerTable,
    biomes: Arc<BiomeTable>,
    mixes: Arc<MixTable>,
    base_tint: Argb,
}

impl Catalog {
    /// Build a catalog from entries, biomes and the base tint grass-like
    /// entries are multiplied with.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::EmptyCatalog`] if `entries` is empty
    /// - [`CatalogError::DuplicateEntry`] if an entry id repeats
    /// - [`CatalogError::DuplicateBiome`] if a biome id repeats
    pub fn build(
        entries: Vec<EntrySpec>,
        biomes: Vec<BiomeSpec>,
        base_tint: Argb,
    ) -> Result<Self, CatalogError> {
        let biomes = BiomeTable::build(&biomes, base_tint)?;
        let mixes = MixTable::build(&biomes);
        Self::from_parts(entries, Arc::new(biomes), Arc::new(mixes), base_tint)
    }

    fn from_parts(
        entries: Vec<EntrySpec>,
        biomes: Arc<BiomeTable>,
        mixes: Arc<MixTable>,
        base_tint: Argb,
    ) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let size = entries.iter().map(|e| e.id as usize + 1).max().unwrap_or(0);
        let mut entry_colors = vec![None; size];
        let mut grass_like = vec![false; size];
        for entry in &entries {
            let slot = &mut entry_colors[entry.id as usize];
            if slot.is_some() {
                return Err(CatalogError::DuplicateEntry { id: entry.id });
            }
            *slot = Some(entry.color);
            grass_like[entry.id as usize] = entry.grass_like;
        }

        let valid_colors: Vec<Argb> = entries.iter().map(|e| e.color).collect();
        let valid_entry_ids: Vec<EntryId> = entries.iter().map(|e| e.id).collect();
        let layers = LayerTable::build(&valid_colors, &valid_entry_ids);

        Ok(Self {
            entries,
            valid_colors,
            valid_entry_ids,
            entry_colors,
            grass_like,
            layers,
            biomes,
            mixes,
            base_tint,
        })
    }

    /// Derive a catalog holding only the entries in `allowed`.
    ///
    /// Entry order is preserved. The biome and mix tables are shared with
    /// `self`, since biome availability does not depend on which entries are
    /// allowed.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyCatalog`] if no entry of `self` is allowed.
    pub fn restrict(&self, allowed: &HashSet<EntryId>) -> Result<Self, CatalogError> {
        let entries: Vec<EntrySpec> = self
            .entries
            .iter()
            .filter(|e| allowed.contains(&e.id))
            .copied()
            .collect();
        Self::from_parts(
            entries,
            Arc::clone(&self.biomes),
            Arc::clone(&self.mixes),
            self.base_tint,
        )
    }

    /// Stored color of an entry.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownEntry`] if `id` is not in this catalog.
    pub fn color_of(&self, id: EntryId) -> Result<Argb, CatalogError> {
        self.entry_colors
            .get(id as usize)
            .copied()
            .flatten()
            .ok_or(CatalogError::UnknownEntry { id })
    }

    /// Whether `id` is a grass-like entry of this catalog.
    pub fn is_grass_like(&self, id: EntryId) -> bool {
        self.grass_like.get(id as usize).copied().unwrap_or(false)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        matches!(self.entry_colors.get(id as usize), Some(Some(_)))
    }

    /// The entries the catalog was built from, in input order.
    pub fn entries(&self) -> &[EntrySpec] {
        &self.entries
    }

    pub fn valid_colors(&self) -> &[Argb] {
        &self.valid_colors
    }

    pub fn valid_entry_ids(&self) -> &[EntryId] {
        &self.valid_entry_ids
    }

    /// Valid colors with every grass-like entry recolored for `biome`.
    ///
    /// Without a biome, or for an unknown or invalid one, the stored colors
    /// are returned unchanged. Index-aligned with [`valid_entry_ids`].
    ///
    /// [`valid_entry_ids`]: Catalog::valid_entry_ids
    pub fn effective_colors(&self, biome: Option<BiomeId>) -> Vec<Argb> {
        let tint = biome
            .and_then(|id| self.biome(id))
            .filter(|b| b.is_valid())
            .map(|b| b.tint_combined);

        match tint {
            Some(tint) => self
                .entries
                .iter()
                .map(|e| if e.grass_like { tint } else { e.color })
                .collect(),
            None => self.valid_colors.clone(),
        }
    }

    pub fn layer_colors(&self) -> &[Argb] {
        &self.layers.colors
    }

    pub fn layer_pairs(&self) -> &[LayerPair] {
        &self.layers.pairs
    }

    pub fn biome(&self, id: BiomeId) -> Option<&Biome> {
        self.biomes.get(id)
    }

    /// Biomes searches may return, in input order.
    pub fn valid_biomes(&self) -> impl Iterator<Item = &Biome> + '_ {
        self.biomes.valid_biomes()
    }

    /// All biomes including placeholders, in id order.
    pub fn biomes(&self) -> impl Iterator<Item = &Biome> + '_ {
        self.biomes.by_id.iter().flatten()
    }

    /// The first valid biome, used when no biome context is given.
    pub fn default_biome(&self) -> Option<BiomeId> {
        self.biomes.valid.first().copied()
    }

    pub fn mix_colors(&self) -> &[Argb] {
        &self.mixes.colors
    }

    /// Packed mix ids, index-aligned with [`mix_colors`](Catalog::mix_colors).
    pub fn mix_ids(&self) -> &[u64] {
        &self.mixes.ids
    }

    pub fn mix(&self, index: usize) -> Option<BiomeMix> {
        self.mixes.get(index)
    }

    pub fn base_tint(&self) -> Argb {
        self.base_tint
    }

    pub fn len(&self) -> usize {
        self.valid_colors.len()
    }

    /// Always false for a successfully built catalog.
    pub fn is_empty(&self) -> bool {
        self.valid_colors.is_empty()
    }
}
