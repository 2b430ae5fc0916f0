//! Test fixtures and constants.

use blockpaint::models::CatalogConfig;
use blockpaint::services::LoadedCatalog;
use block_match::Argb;

/// Entry names from the embedded catalog.yaml
pub mod names {
    pub const STONE: &str = "minecraft:stone";
    pub const GRASS_BLOCK: &str = "minecraft:grass_block";
    pub const SNOW_BLOCK: &str = "minecraft:snow_block";
    pub const BLACK_WOOL: &str = "minecraft:black_wool";
    pub const WHITE_WOOL: &str = "minecraft:white_wool";
    pub const RED_GLASS: &str = "minecraft:red_stained_glass";
}

/// Small catalog with exact colors for predictable matches
pub const SMALL_CATALOG: &str = r##"
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
  - { id: 2, name: olive, tint: "#808020" }
  - { id: 3, name: marsh, tint: "#406040", placeholder: true }
"##;

pub fn small_catalog() -> LoadedCatalog {
    LoadedCatalog::from_config(&CatalogConfig::from_yaml(SMALL_CATALOG).unwrap()).unwrap()
}

/// Horizontal black to white gradient, one row per `height`
pub fn gradient(width: u32, height: u32) -> Vec<Argb> {
    let max = width.saturating_sub(1).max(1);
    (0..height)
        .flat_map(|_| {
            (0..width).map(move |x| {
                let v = (x * 255 / max) as u8;
                Argb::from_rgb(v, v, v)
            })
        })
        .collect()
}
