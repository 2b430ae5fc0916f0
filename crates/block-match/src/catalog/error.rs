//! Error types for catalog construction and lookups

use thiserror::Error;

use super::{BiomeId, EntryId};

/// Error type for catalog construction and id lookups.
///
/// A search that finds nothing is not an error; searches return `Option`.
/// These variants cover malformed input and ids the catalog does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No entries were supplied, or a restriction removed all of them
    #[error("catalog has no searchable entries")]
    EmptyCatalog,
    /// The same entry id appears twice in the input
    #[error("duplicate entry id {id}")]
    DuplicateEntry {
        /// The repeated id
        id: EntryId,
    },
    /// The same biome id appears twice in the input
    #[error("duplicate biome id {id}")]
    DuplicateBiome {
        /// The repeated id
        id: BiomeId,
    },
    /// Entry id outside the catalog's id range
    #[error("unknown entry id {id}")]
    UnknownEntry {
        /// The requested id
        id: EntryId,
    },
    /// Biome id with no biome in the catalog
    #[error("unknown biome id {id}")]
    UnknownBiome {
        /// The requested id
        id: BiomeId,
    },
}
