//! Image to block grid conversion
//!
//! Rows are converted in parallel. Every rayon task forks its own matcher
//! from a template chain, so caches and dither state are per task.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use block_match::color::{composite_over, distance};
use block_match::{
    Argb, BiomeId, Catalog, DitherOptions, EntryId, MatchError, Matcher, MatcherBuilder,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ImageError};
use crate::models::HostIdMap;

use super::catalog_loader::LoadedCatalog;

/// How pixels are turned into cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConvertMode {
    /// Nearest entry per pixel
    #[default]
    Nearest,
    /// Nearest entry, or a translucent entry over an opaque one when the
    /// composite is closer
    Layered,
    /// Nearest entry with error feedback between repeated colors
    Dither,
    /// Plain entries or biome-tinted grass, with rotating biome mixes
    Terrain,
}

/// Conversion settings
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub mode: ConvertMode,
    /// Subtracted from biome distances in terrain mode
    pub biome_priority: u64,
    /// Seed for dither jitter; `None` dithers deterministically
    pub seed: Option<u64>,
    /// Restrict output to these entries
    pub only: Option<Vec<EntryId>>,
    pub cached: bool,
    /// Convert rows on the rayon pool
    pub parallel: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: ConvertMode::Nearest,
            biome_priority: 0,
            seed: None,
            only: None,
            cached: true,
            parallel: true,
        }
    }
}

/// One output cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Base entry, `None` for fully transparent pixels
    pub entry: Option<EntryId>,
    /// Translucent entry placed over `entry`
    pub overlay: Option<EntryId>,
    /// Biome the cell's grass takes its tint from
    pub biome: Option<BiomeId>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        entry: None,
        overlay: None,
        biome: None,
    };

    pub fn entry(id: EntryId) -> Self {
        Self {
            entry: Some(id),
            ..Self::EMPTY
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

/// Row-major grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGrid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
}

/// Serialized form of a [`BlockGrid`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    pub width: u32,
    pub height: u32,
    /// Names of every entry the grid uses
    pub palette: BTreeMap<EntryId, String>,
    pub cells: Vec<Cell>,
}

impl BlockGrid {
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize)
    }

    /// Entry ids used as base or overlay
    pub fn used_entries(&self) -> BTreeSet<EntryId> {
        self.cells
            .iter()
            .flat_map(|c| c.entry.into_iter().chain(c.overlay))
            .collect()
    }

    pub fn to_document(&self, names: &HostIdMap) -> GridDocument {
        let palette = self
            .used_entries()
            .into_iter()
            .map(|id| {
                let name = names
                    .name_of(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{id}"));
                (id, name)
            })
            .collect();

        GridDocument {
            width: self.width,
            height: self.height,
            palette,
            cells: self.cells.clone(),
        }
    }

    pub fn to_json(&self, names: &HostIdMap) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_document(names))
    }
}

/// Converts pixel buffers into block grids over one catalog
pub struct Converter {
    catalog: Arc<Catalog>,
    fallback: Option<EntryId>,
    grass: Option<EntryId>,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(loaded: &LoadedCatalog, options: ConvertOptions) -> Self {
        // biome cells must not bring in grass the caller excluded
        let grass = loaded
            .grass_entry()
            .filter(|id| options.only.as_ref().map_or(true, |only| only.contains(id)));
        Self {
            catalog: Arc::clone(&loaded.catalog),
            fallback: loaded.fallback(),
            grass,
            options,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Matcher chain for the configured mode
    pub fn matcher(&self) -> Result<Box<dyn Matcher>, MatchError> {
        let mut builder = MatcherBuilder::new(Arc::clone(&self.catalog)).cached(self.options.cached);
        if let Some(ref only) = self.options.only {
            builder = builder.restrict_to(only.iter().copied());
        }
        if matches!(self.options.mode, ConvertMode::Dither | ConvertMode::Terrain) {
            let dither = self
                .options
                .seed
                .map(DitherOptions::jitter)
                .unwrap_or_default();
            builder = builder.dither(dither);
        }
        builder.build()
    }

    /// Convert a row-major pixel buffer
    pub fn convert(&self, pixels: &[Argb], width: u32, height: u32) -> Result<BlockGrid, ConvertError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: pixels.len(),
            }
            .into());
        }

        let matcher = self.matcher()?;
        tracing::debug!(width, height, mode = ?self.options.mode, "Converting image");

        let cells = if expected == 0 {
            Vec::new()
        } else if self.options.parallel {
            pixels
                .par_chunks(width as usize)
                .map_init(
                    || matcher.fork(),
                    |m, row| {
                        row.iter()
                            .map(|&px| self.cell(m.as_mut(), px))
                            .collect::<Vec<_>>()
                    },
                )
                .collect::<Vec<_>>()
                .concat()
        } else {
            let mut m = matcher;
            pixels.iter().map(|&px| self.cell(m.as_mut(), px)).collect()
        };

        Ok(BlockGrid {
            width,
            height,
            cells,
        })
    }

    fn cell(&self, matcher: &mut dyn Matcher, color: Argb) -> Cell {
        if color.alpha() == 0 {
            return Cell::EMPTY;
        }

        let cell = match self.options.mode {
            ConvertMode::Nearest | ConvertMode::Dither => matcher.nearest(color).map(Cell::entry),
            ConvertMode::Layered => self.layered_cell(matcher, color),
            ConvertMode::Terrain => self.terrain_cell(matcher, color),
        };

        cell.or_else(|| self.fallback.map(Cell::entry))
            .unwrap_or(Cell::EMPTY)
    }

    fn layered_cell(&self, matcher: &mut dyn Matcher, color: Argb) -> Option<Cell> {
        let entry = matcher.nearest(color);
        let entry_distance = entry
            .and_then(|e| matcher.color_of(e).ok())
            .map(|c| distance(c, color));

        let layered = matcher.nearest_layer_pair(color).and_then(|pair| {
            let top = self.catalog.color_of(pair.top).ok()?;
            let bottom = self.catalog.color_of(pair.bottom).ok()?;
            Some((pair, distance(composite_over(top, bottom), color)))
        });

        match (entry_distance, layered) {
            (Some(d), Some((pair, layer_d))) if layer_d < d => Some(Cell {
                entry: Some(pair.bottom),
                overlay: Some(pair.top),
                biome: None,
            }),
            (None, Some((pair, _))) => Some(Cell {
                entry: Some(pair.bottom),
                overlay: Some(pair.top),
                biome: None,
            }),
            _ => entry.map(Cell::entry),
        }
    }

    fn terrain_cell(&self, matcher: &mut dyn Matcher, color: Argb) -> Option<Cell> {
        match matcher.entry_or_biome(color, self.options.biome_priority) {
            Some(choice) if choice.entry_is_closer => Some(Cell::entry(choice.entry)),
            Some(choice) => match self.grass {
                Some(grass) => Some(Cell {
                    entry: Some(grass),
                    overlay: None,
                    biome: Some(choice.biome),
                }),
                None => Some(Cell::entry(choice.entry)),
            },
            None => matcher.nearest(color).map(Cell::entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogConfig;
    use pretty_assertions::assert_eq;

    const YAML: &str = r##"
base_tint: "#FFFFFF"
fallback: "stone"
entries:
  - { name: "black", color: "#000000" }
  - { name: "white", color: "#FFFFFF" }
  - { name: "stone", color: "#7D7D7D" }
  - { name: "red_glass", color: "#80FF0000" }
  - { name: "grass", color: "#FFFFFF", grass_like: true }
biomes:
  - { id: 1, name: green, tint: "#20C020" }
  - { id: 2, name: blue, tint: "#2020C0" }
"##;

    fn loaded() -> LoadedCatalog {
        LoadedCatalog::from_config(&CatalogConfig::from_yaml(YAML).unwrap()).unwrap()
    }

    fn sequential(mode: ConvertMode) -> ConvertOptions {
        ConvertOptions {
            mode,
            parallel: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_size_mismatch() {
        let converter = Converter::new(&loaded(), ConvertOptions::default());
        let err = converter.convert(&[Argb::WHITE; 3], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Image(ImageError::SizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_empty_image() {
        let converter = Converter::new(&loaded(), ConvertOptions::default());
        let grid = converter.convert(&[], 0, 0).unwrap();
        assert!(grid.cells.is_empty());
    }

    #[test]
    fn test_nearest_mode_and_transparency() {
        let converter = Converter::new(&loaded(), ConvertOptions::default());
        let pixels = [
            Argb(0xFF050505),
            Argb(0xFFFAFAFA),
            Argb::TRANSPARENT,
            Argb(0xFF808080),
        ];
        let grid = converter.convert(&pixels, 2, 2).unwrap();
        assert_eq!(grid.get(0, 0), Some(&Cell::entry(0)));
        assert_eq!(grid.get(0, 1), Some(&Cell::EMPTY));
        assert_eq!(grid.get(1, 1), Some(&Cell::entry(2)));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_unmatched_alpha_uses_fallback() {
        let converter = Converter::new(&loaded(), ConvertOptions::default());
        let grid = converter.convert(&[Argb(0x40123456)], 1, 1).unwrap();
        assert_eq!(grid.cells, vec![Cell::entry(2)]);
    }

    #[test]
    fn test_parallel_matches_sequential_for_nearest() {
        let loaded = loaded();
        let pixels: Vec<Argb> = (0..64u32)
            .map(|i| Argb::from_rgb((i * 4) as u8, (i * 3) as u8, (i * 2) as u8))
            .collect();
        let par = Converter::new(&loaded, ConvertOptions::default())
            .convert(&pixels, 8, 8)
            .unwrap();
        let seq = Converter::new(&loaded, sequential(ConvertMode::Nearest))
            .convert(&pixels, 8, 8)
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_layered_mode_uses_pair_when_closer() {
        let loaded = loaded();
        let converter = Converter::new(&loaded, sequential(ConvertMode::Layered));
        let target = composite_over(Argb(0x80FF0000), Argb(0xFFFFFFFF));
        let grid = converter.convert(&[target], 1, 1).unwrap();
        let cell = grid.cells[0];
        assert_eq!(cell.overlay, Some(3));
        assert!(cell.entry.is_some());

        let grid = converter.convert(&[Argb(0xFF000000)], 1, 1).unwrap();
        assert_eq!(grid.cells[0], Cell::entry(0));
    }

    #[test]
    fn test_only_restricts_output() {
        let loaded = loaded();
        let options = ConvertOptions {
            only: Some(vec![0, 1]),
            ..sequential(ConvertMode::Nearest)
        };
        let grid = Converter::new(&loaded, options)
            .convert(&[Argb(0xFF7D7D7D)], 1, 1)
            .unwrap();
        let entry = grid.cells[0].entry.unwrap();
        assert!(entry == 0 || entry == 1);
    }

    #[test]
    fn test_dither_mode_mixes_repeated_grey() {
        let loaded = loaded();
        let options = ConvertOptions {
            only: Some(vec![0, 1]),
            ..sequential(ConvertMode::Dither)
        };
        let grid = Converter::new(&loaded, options)
            .convert(&[Argb(0xFF606060); 8], 8, 1)
            .unwrap();
        let used = grid.used_entries();
        assert_eq!(used, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_terrain_mode_places_grass_with_biome() {
        let loaded = loaded();
        let green = loaded.catalog.biome(1).unwrap().tint_combined;
        let grid = Converter::new(&loaded, sequential(ConvertMode::Terrain))
            .convert(&[green, Argb(0xFF000000)], 2, 1)
            .unwrap();
        assert_eq!(grid.cells[0].entry, Some(4));
        assert!(grid.cells[0].biome.is_some());
        assert_eq!(grid.cells[1], Cell::entry(0));
    }

    #[test]
    fn test_document_palette_lists_used_names() {
        let loaded = loaded();
        let grid = BlockGrid {
            width: 2,
            height: 1,
            cells: vec![
                Cell {
                    entry: Some(1),
                    overlay: Some(3),
                    biome: None,
                },
                Cell::EMPTY,
            ],
        };
        let doc = grid.to_document(&loaded.ids);
        assert_eq!(
            doc.palette,
            BTreeMap::from([(1, "white".to_string()), (3, "red_glass".to_string())])
        );

        let json = grid.to_json(&loaded.ids).unwrap();
        let back: GridDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_terrain_mode_respects_only() {
        let loaded = loaded();
        let green = loaded.catalog.biome(1).unwrap().tint_combined;
        let options = ConvertOptions {
            only: Some(vec![0, 1]),
            ..sequential(ConvertMode::Terrain)
        };
        let grid = Converter::new(&loaded, options)
            .convert(&[green, green, Argb(0xFF000000)], 3, 1)
            .unwrap();
        for cell in &grid.cells {
            let entry = cell.entry.unwrap();
            assert!(entry == 0 || entry == 1, "entry {entry} outside the allowed set");
            assert_eq!(cell.biome, None);
        }

        // grass stays available when it is allowed
        let options = ConvertOptions {
            only: Some(vec![0, 4]),
            ..sequential(ConvertMode::Terrain)
        };
        let grid = Converter::new(&loaded, options).convert(&[green], 1, 1).unwrap();
        assert_eq!(grid.cells[0].entry, Some(4));
        assert!(grid.cells[0].biome.is_some());
    }
}
