//! The immutable catalog of searchable colors
//!
//! A [`Catalog`] is built once from a list of [`EntrySpec`]s, a list of
//! [`BiomeSpec`]s and a base tint. Construction precomputes every table the
//! matchers scan:
//!
//! - the valid colors and their entry ids, in input order
//! - the layer table: each transparent entry composited over each opaque one
//! - the biome table, dense by biome id
//! - the biome mix table: averages of every triplet of valid biomes
//!
//! A catalog is never mutated. Restricting it to a subset of entries builds
//! a new one with [`Catalog::restrict`].

mod biome;
mod catalog;
mod error;
mod tables;

pub use biome::{Biome, BiomeMix, BiomeSpec};
pub use catalog::Catalog;
pub use error::CatalogError;

use crate::color::Argb;

/// Dense identifier of a catalog entry.
pub type EntryId = u32;

/// Identifier of a biome. Mixes pack three of them into 8-bit lanes.
pub type BiomeId = u8;

/// Input record for one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntrySpec {
    pub id: EntryId,
    pub color: Argb,
    /// Grass-like entries take the tint of the biome they are placed in
    pub grass_like: bool,
}

impl EntrySpec {
    pub const fn new(id: EntryId, color: Argb) -> Self {
        Self {
            id,
            color,
            grass_like: false,
        }
    }

    pub const fn grass(id: EntryId, color: Argb) -> Self {
        Self {
            id,
            color,
            grass_like: true,
        }
    }
}

/// A transparent entry placed over an opaque one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerPair {
    pub top: EntryId,
    pub bottom: EntryId,
}
