//! Color matchers
//!
//! [`Matcher`] is the lookup contract. [`PaletteMatcher`] implements it by
//! scanning a [`Catalog`]; the decorators wrap any boxed matcher and add
//! behavior without changing what a lookup means:
//!
//! - [`CachingMatcher`] memoizes results per input color
//! - [`FilteringMatcher`] searches a restricted copy of the catalog
//! - [`DitheringMatcher`] nudges repeated colors toward their target and
//!   rotates through biome mixes
//!
//! Lookups take `&mut self` because decorators update their state on every
//! call. A matcher with state must not be shared between workers; give each
//! worker its own instance with [`Matcher::fork`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use block_match::catalog::{Catalog, EntrySpec};
//! use block_match::color::Argb;
//! use block_match::matcher::{CachingMatcher, Matcher, PaletteMatcher};
//!
//! let catalog = Arc::new(
//!     Catalog::build(
//!         vec![EntrySpec::new(1, Argb(0xFF000000)), EntrySpec::new(2, Argb(0xFFFFFFFF))],
//!         Vec::new(),
//!         Argb::WHITE,
//!     )
//!     .unwrap(),
//! );
//!
//! let mut matcher = CachingMatcher::new(Box::new(PaletteMatcher::new(catalog)));
//! assert_eq!(matcher.nearest(Argb(0xFF101010)), Some(1));
//! assert_eq!(matcher.nearest(Argb(0xFFF0F0F0)), Some(2));
//! ```

mod base;
mod caching;
mod dithering;
mod filtering;

pub use base::PaletteMatcher;
pub use caching::CachingMatcher;
pub use dithering::{DitherOptions, DitherState, DitheringMatcher};
pub use filtering::FilteringMatcher;

use std::sync::Arc;

use crate::catalog::{BiomeId, BiomeMix, Catalog, CatalogError, EntryId, LayerPair};
use crate::color::{distance, Argb};

/// Direction of a shade search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    /// Strictly higher intensity than the input
    Lighter,
    /// Strictly lower intensity than the input
    Darker,
}

/// Result of [`Matcher::entry_or_biome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainChoice {
    pub entry: EntryId,
    pub biome: BiomeId,
    /// True if the plain entry is closer than the biome-tinted alternative
    pub entry_is_closer: bool,
}

/// Lookups of catalog entries, layer pairs and biomes by color.
///
/// Every search returns `None` when no candidate satisfies its constraints,
/// most commonly when no catalog color shares the input's alpha byte.
pub trait Matcher: Send + Sync {
    /// The catalog searches run over.
    fn catalog(&self) -> &Arc<Catalog>;

    /// Color of an entry as this matcher sees it.
    ///
    /// Grass-like entries report the tint of the matcher's biome.
    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError>;

    /// Biome grass-like entries are recolored with, `None` for stored colors.
    fn biome(&self) -> Option<BiomeId>;

    /// Entry with the smallest distance to `color` among candidates with the
    /// same alpha byte. Ties go to the first candidate in catalog order.
    fn nearest(&mut self, color: Argb) -> Option<EntryId>;

    /// Like [`nearest`](Matcher::nearest), but a candidate exactly equal to
    /// `color` is skipped.
    fn next_nearest(&mut self, color: Argb) -> Option<EntryId>;

    /// Nearest entry whose intensity is strictly on the `shade` side of
    /// `color`'s intensity, skipping exact matches.
    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId>;

    /// Transparent-over-opaque pair whose composite is nearest to `color`.
    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair>;

    /// Valid biome whose combined tint is nearest to `color`.
    ///
    /// Biome tints are always opaque, so there is no alpha filter.
    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId>;

    /// Biome triplet whose averaged tint is nearest to `color`.
    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix>;

    /// New independent matcher over the same catalog with fresh state.
    fn fork(&self) -> Box<dyn Matcher>;

    /// One biome out of the nearest mix.
    ///
    /// Stateless matchers always return the first slot; the dithering
    /// matcher rotates through all three.
    fn nearest_biome_mix_rotating(&mut self, color: Argb) -> Option<BiomeId> {
        self.nearest_biome_mix(color).map(|mix| mix.ids[0])
    }

    fn lighter(&mut self, color: Argb) -> Option<EntryId> {
        self.nearest_shade(color, Shade::Lighter)
    }

    fn darker(&mut self, color: Argb) -> Option<EntryId> {
        self.nearest_shade(color, Shade::Darker)
    }

    /// Lighter variant of an entry, or the entry itself if there is none.
    fn lighter_entry(&mut self, entry: EntryId) -> EntryId {
        self.shade_entry(entry, Shade::Lighter)
    }

    /// Darker variant of an entry, or the entry itself if there is none.
    fn darker_entry(&mut self, entry: EntryId) -> EntryId {
        self.shade_entry(entry, Shade::Darker)
    }

    fn shade_entry(&mut self, entry: EntryId, shade: Shade) -> EntryId {
        match self.color_of(entry) {
            Ok(color) if color != Argb::TRANSPARENT => {
                self.nearest_shade(color, shade).unwrap_or(entry)
            }
            _ => entry,
        }
    }

    /// Combined tint of a biome.
    fn color_of_biome(&self, biome: BiomeId) -> Result<Argb, CatalogError> {
        self.catalog()
            .biome(biome)
            .map(|b| b.tint_combined)
            .ok_or(CatalogError::UnknownBiome { id: biome })
    }

    /// Ids of every searchable entry, in catalog order.
    fn all_valid_entry_ids(&self) -> Vec<EntryId> {
        self.catalog().valid_entry_ids().to_vec()
    }

    /// Decide between a plain entry and a biome-tinted cell for `color`.
    ///
    /// The biome's distance is reduced by `biome_priority` before comparing,
    /// so larger values favor biomes.
    fn entry_or_biome(&mut self, color: Argb, biome_priority: u64) -> Option<TerrainChoice> {
        let entry = self.nearest(color)?;
        let biome = self.nearest_biome(color)?;
        let entry_distance = distance(self.color_of(entry).ok()?, color);
        let biome_distance = distance(self.color_of_biome(biome).ok()?, color);
        Some(TerrainChoice {
            entry,
            biome,
            entry_is_closer: biome_distance.saturating_sub(biome_priority) > entry_distance,
        })
    }
}

impl Matcher for Box<dyn Matcher> {
    fn catalog(&self) -> &Arc<Catalog> {
        (**self).catalog()
    }

    fn color_of(&self, entry: EntryId) -> Result<Argb, CatalogError> {
        (**self).color_of(entry)
    }

    fn biome(&self) -> Option<BiomeId> {
        (**self).biome()
    }

    fn nearest(&mut self, color: Argb) -> Option<EntryId> {
        (**self).nearest(color)
    }

    fn next_nearest(&mut self, color: Argb) -> Option<EntryId> {
        (**self).next_nearest(color)
    }

    fn nearest_shade(&mut self, color: Argb, shade: Shade) -> Option<EntryId> {
        (**self).nearest_shade(color, shade)
    }

    fn nearest_layer_pair(&mut self, color: Argb) -> Option<LayerPair> {
        (**self).nearest_layer_pair(color)
    }

    fn nearest_biome(&mut self, color: Argb) -> Option<BiomeId> {
        (**self).nearest_biome(color)
    }

    fn nearest_biome_mix(&mut self, color: Argb) -> Option<BiomeMix> {
        (**self).nearest_biome_mix(color)
    }

    fn fork(&self) -> Box<dyn Matcher> {
        (**self).fork()
    }

    fn nearest_biome_mix_rotating(&mut self, color: Argb) -> Option<BiomeId> {
        (**self).nearest_biome_mix_rotating(color)
    }

    fn entry_or_biome(&mut self, color: Argb, biome_priority: u64) -> Option<TerrainChoice> {
        (**self).entry_or_biome(color, biome_priority)
    }
}
