//! Derived lookup tables
//!
//! Both the layer table and the mix table are keyed by the color they
//! produce. Several inputs can produce the same color; the first one in
//! enumeration order is kept. The enumeration order is part of the contract
//! and is covered by tests.

use std::collections::HashSet;

use crate::color::{average, composite_over, Argb};

use super::biome::{Biome, BiomeMix, BiomeSpec};
use super::error::CatalogError;
use super::{BiomeId, EntryId, LayerPair};

/// Transparent-over-opaque pairs keyed by their composited color.
#[derive(Debug, Clone, Default)]
pub(crate) struct LayerTable {
    pub colors: Vec<Argb>,
    pub pairs: Vec<LayerPair>,
}

impl LayerTable {
    /// Outer loop over transparent entries, inner loop over opaque entries,
    /// both in the order of `colors`.
    pub fn build(colors: &[Argb], ids: &[EntryId]) -> Self {
        let transparent: Vec<(Argb, EntryId)> = colors
            .iter()
            .zip(ids)
            .filter(|(c, _)| !c.is_opaque())
            .map(|(&c, &id)| (c, id))
            .collect();
        let opaque: Vec<(Argb, EntryId)> = colors
            .iter()
            .zip(ids)
            .filter(|(c, _)| c.is_opaque())
            .map(|(&c, &id)| (c, id))
            .collect();

        let mut table = Self::default();
        let mut seen = HashSet::new();
        for &(top_color, top) in &transparent {
            for &(bottom_color, bottom) in &opaque {
                let combined = composite_over(top_color, bottom_color);
                if seen.insert(combined) {
                    table.colors.push(combined);
                    table.pairs.push(LayerPair { top, bottom });
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}

/// Dense biome table plus the valid biomes in input order.
#[derive(Debug, Clone, Default)]
pub(crate) struct BiomeTable {
    pub by_id: Vec<Option<Biome>>,
    pub valid: Vec<BiomeId>,
}

impl BiomeTable {
    pub fn build(specs: &[BiomeSpec], base_tint: Argb) -> Result<Self, CatalogError> {
        let size = specs.iter().map(|s| s.id as usize + 1).max().unwrap_or(0);
        let mut table = Self {
            by_id: vec![None; size],
            valid: Vec::new(),
        };

        for spec in specs {
            let slot = &mut table.by_id[spec.id as usize];
            if slot.is_some() {
                return Err(CatalogError::DuplicateBiome { id: spec.id });
            }
            let biome = Biome::from_spec(spec, base_tint);
            if biome.is_valid() {
                table.valid.push(biome.id);
            }
            *slot = Some(biome);
        }
        Ok(table)
    }

    pub fn get(&self, id: BiomeId) -> Option<&Biome> {
        self.by_id.get(id as usize).and_then(Option::as_ref)
    }

    pub fn valid_biomes(&self) -> impl Iterator<Item = &Biome> + '_ {
        self.valid.iter().filter_map(|&id| self.get(id))
    }
}

/// Averages of every biome triplet keyed by the averaged color.
#[derive(Debug, Clone, Default)]
pub(crate) struct MixTable {
    pub colors: Vec<Argb>,
    pub ids: Vec<u64>,
}

impl MixTable {
    /// Triplets `i <= j <= k` over the valid biomes in input order.
    pub fn build(biomes: &BiomeTable) -> Self {
        let valid: Vec<&Biome> = biomes.valid_biomes().collect();

        let mut table = Self::default();
        let mut seen = HashSet::new();
        for i in 0..valid.len() {
            for j in i..valid.len() {
                for k in j..valid.len() {
                    let (a, b, c) = (valid[i], valid[j], valid[k]);
                    let avg = average(&[a.tint_combined, b.tint_combined, c.tint_combined]);
                    if seen.insert(avg) {
                        let mix = BiomeMix {
                            ids: [a.id, b.id, c.id],
                            average: avg,
                        };
                        table.colors.push(avg);
                        table.ids.push(mix.pack());
                    }
                }
            }
        }
        table
    }

    pub fn get(&self, index: usize) -> Option<BiomeMix> {
        let packed = *self.ids.get(index)?;
        Some(BiomeMix::unpack(packed, self.colors[index]))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
}
