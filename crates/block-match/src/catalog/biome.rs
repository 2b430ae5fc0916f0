//! Biome tints and three-way biome mixes

use crate::color::{multiply, Argb};

use super::BiomeId;

/// Input record for one biome.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeSpec {
    pub id: BiomeId,
    pub name: String,
    pub temperature: f32,
    pub rainfall: f32,
    /// Raw grass tint of the biome
    pub tint: Argb,
    /// Placeholder biomes keep their id slot but never take part in searches
    pub placeholder: bool,
}

impl BiomeSpec {
    /// Create a non-placeholder biome with neutral climate values.
    pub fn new(id: BiomeId, name: impl Into<String>, tint: Argb) -> Self {
        Self {
            id,
            name: name.into(),
            temperature: 0.5,
            rainfall: 0.5,
            tint,
            placeholder: false,
        }
    }

    pub fn with_climate(mut self, temperature: f32, rainfall: f32) -> Self {
        self.temperature = temperature;
        self.rainfall = rainfall;
        self
    }

    pub fn placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }
}

/// A biome as stored in the catalog.
///
/// `tint_combined` is the color a grass-like entry takes in this biome: the
/// catalog's base tint multiplied by the biome tint.
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    pub id: BiomeId,
    pub name: String,
    pub temperature: f32,
    pub rainfall: f32,
    pub tint: Argb,
    pub tint_combined: Argb,
    valid: bool,
}

impl Biome {
    pub(crate) fn from_spec(spec: &BiomeSpec, base_tint: Argb) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            temperature: spec.temperature,
            rainfall: spec.rainfall,
            tint: spec.tint,
            tint_combined: multiply(base_tint, spec.tint),
            valid: !spec.placeholder && spec.tint != Argb::TRANSPARENT,
        }
    }

    /// Whether searches may return this biome.
    ///
    /// Placeholders and biomes without a tint are kept in the table so their
    /// ids resolve, but they are skipped by every search.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Three biomes whose averaged tints approximate a color.
///
/// The same biome may appear more than once. Slot order is the enumeration
/// order used when the mix table was built (`ids[0] <= ids[1] <= ids[2]` by
/// position in the biome list, not necessarily by id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BiomeMix {
    pub ids: [BiomeId; 3],
    pub average: Argb,
}

impl BiomeMix {
    /// Pack the three ids into one word, `id0 | id1 << 8 | id2 << 16`.
    ///
    /// # Example
    /// ```
    /// use block_match::catalog::BiomeMix;
    /// use block_match::color::Argb;
    ///
    /// let mix = BiomeMix { ids: [1, 2, 3], average: Argb::WHITE };
    /// assert_eq!(mix.pack(), 0x03_02_01);
    /// assert_eq!(BiomeMix::unpack(mix.pack(), Argb::WHITE), mix);
    /// ```
    #[inline]
    pub fn pack(&self) -> u64 {
        self.ids[0] as u64 | (self.ids[1] as u64) << 8 | (self.ids[2] as u64) << 16
    }

    #[inline]
    pub fn unpack(packed: u64, average: Argb) -> Self {
        Self {
            ids: [
                (packed & 0xFF) as BiomeId,
                ((packed >> 8) & 0xFF) as BiomeId,
                ((packed >> 16) & 0xFF) as BiomeId,
            ],
            average,
        }
    }

    /// Biome in rotation slot `slot`, taken modulo 3.
    #[inline]
    pub fn slot(&self, slot: usize) -> BiomeId {
        self.ids[slot % 3]
    }
}
