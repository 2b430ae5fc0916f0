//! block-match: perceptual matching of colors against a catalog of blocks
//!
//! Given a catalog of discrete entries, each with an average color, this
//! crate finds the entry that best stands in for an arbitrary ARGB color.
//! It also finds pairs of a translucent entry layered over an opaque one,
//! and biomes whose grass tint approximates a color.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use block_match::{Argb, Catalog, EntrySpec, Matcher, MatcherBuilder};
//!
//! let catalog = Catalog::build(
//!     vec![
//!         EntrySpec::new(1, Argb(0xFF000000)),
//!         EntrySpec::new(2, Argb(0xFFFFFFFF)),
//!     ],
//!     Vec::new(),
//!     Argb::WHITE,
//! )
//! .unwrap();
//!
//! let mut matcher = MatcherBuilder::new(Arc::new(catalog)).build().unwrap();
//! assert_eq!(matcher.nearest(Argb(0xFF101010)), Some(1));
//! assert_eq!(matcher.nearest(Argb(0xFFF0F0F0)), Some(2));
//! // nothing in the catalog is fully transparent
//! assert_eq!(matcher.nearest(Argb(0x00000000)), None);
//! ```
//!
//! # Distance
//!
//! [`color::distance`] is a weighted RGB distance whose red and blue
//! weights depend on the mean red level, plus a chromaticity term. All of it
//! is integer arithmetic; the reciprocals the chromaticity term needs are
//! generated into a table at build time.
//!
//! # Alpha
//!
//! Entry, layer and mix searches only consider candidates whose alpha byte
//! equals the input's. A translucent pixel can only map to a translucent
//! entry. Layer composites and mix averages are opaque.
//!
//! # Concurrency
//!
//! A [`Catalog`] is immutable and shared as `Arc<Catalog>`. Matchers with
//! state ([`CachingMatcher`], [`DitheringMatcher`]) are per worker: call
//! [`Matcher::fork`] once per thread. [`PaletteMatcher`] has no state and
//! its `find_*` methods take `&self`.

pub mod api;
pub mod catalog;
pub mod color;
pub mod matcher;


pub use api::{MatchError, MatcherBuilder};
pub use catalog::{
    Biome, BiomeId, BiomeMix, BiomeSpec, Catalog, CatalogError, EntryId, EntrySpec, LayerPair,
};
pub use color::{Argb, DitherOffset, ParseColorError};
pub use matcher::{
    CachingMatcher, DitherOptions, DitherState, DitheringMatcher, FilteringMatcher, Matcher,
    PaletteMatcher, Shade, TerrainChoice,
};
