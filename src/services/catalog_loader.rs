//! Turns a catalog description into a searchable [`Catalog`]

use std::sync::Arc;

use block_match::{Argb, BiomeSpec, Catalog, EntryId, EntrySpec};

use crate::assets::AssetLoader;
use crate::error::ConfigError;
use crate::models::config::parse_color;
use crate::models::{BaseTint, CatalogConfig, HostIdMap};

/// A built catalog together with the names of its entries
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Arc<Catalog>,
    pub ids: HostIdMap,
}

impl LoadedCatalog {
    /// Build the catalog described by `config`.
    ///
    /// Entry ids follow file order. The base tint is either the color of a
    /// named entry or a literal color.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ConfigError> {
        let mut ids = HostIdMap::new();
        let mut entries = Vec::with_capacity(config.entries.len());

        for (i, entry) in config.entries.iter().enumerate() {
            let id = ids.insert(&entry.name)?;
            let color = parse_color(format!("entries[{i}].color"), &entry.color)?;
            entries.push(EntrySpec {
                id,
                color,
                grass_like: entry.grass_like,
            });
        }

        let base_tint = match &config.base_tint {
            BaseTint::Entry { entry } => {
                let id = ids
                    .id_of(entry)
                    .ok_or_else(|| ConfigError::UnknownEntry(entry.clone()))?;
                entries[id as usize].color
            }
            BaseTint::Color(color) => parse_color("base_tint", color)?,
        };

        let biomes = config
            .biomes
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let tint = parse_color(format!("biomes[{i}].tint"), &b.tint)?;
                let spec = BiomeSpec::new(b.id, b.name.clone(), tint)
                    .with_climate(b.temperature, b.rainfall);
                Ok(if b.placeholder { spec.placeholder() } else { spec })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        if let Some(ref fallback) = config.fallback {
            ids.set_fallback(fallback)?;
        }

        let catalog = Catalog::build(entries, biomes, base_tint)?;
        tracing::debug!(
            entries = catalog.len(),
            layer_pairs = catalog.layer_pairs().len(),
            biome_mixes = catalog.mix_colors().len(),
            base_tint = %base_tint,
            "Built catalog"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            ids,
        })
    }

    /// Load and build the catalog the loader points at
    pub fn load(loader: &AssetLoader) -> Result<Self, ConfigError> {
        let config = CatalogConfig::load_from_assets(loader)?;
        Self::from_config(&config)
    }

    /// Ids for a list of entry names
    pub fn resolve_names<'a, I>(&self, names: I) -> Result<Vec<EntryId>, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ids.ids_of(names)
    }

    pub fn fallback(&self) -> Option<EntryId> {
        self.ids.fallback()
    }

    /// First grass-like entry, used for biome-tinted cells
    pub fn grass_entry(&self) -> Option<EntryId> {
        self.catalog
            .entries()
            .iter()
            .find(|e| e.grass_like)
            .map(|e| e.id)
    }

    /// Display name of an entry, or its id if it has none
    pub fn describe(&self, id: EntryId) -> String {
        match self.ids.name_of(id) {
            Some(name) => name.to_string(),
            None => format!("#{id}"),
        }
    }

    /// Color of an entry as stored in the catalog
    pub fn color_of(&self, id: EntryId) -> Option<Argb> {
        self.catalog.color_of(id).ok()
    }
}
