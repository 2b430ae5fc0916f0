use crate::assets::AssetLoader;
use crate::error::ConfigError;
use block_match::Argb;
use serde::{Deserialize, Serialize};

/// Catalog description loaded from catalog.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Color grass-like entries are multiplied with biome tints
    pub base_tint: BaseTint,

    /// Entry used for pixels no entry matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Catalog entries; ids are assigned in file order
    pub entries: Vec<EntryConfig>,

    /// Biome tints
    #[serde(default)]
    pub biomes: Vec<BiomeConfig>,
}

/// Base tint, either the color of a named entry or a literal color
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum BaseTint {
    Entry { entry: String },
    Color(String),
}

/// One catalog entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EntryConfig {
    /// Host name of the entry (e.g. "minecraft:stone")
    pub name: String,

    /// Average color as `#RRGGBB` or `#AARRGGBB`
    pub color: String,

    /// Whether the entry takes the biome tint
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub grass_like: bool,
}

/// One biome
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BiomeConfig {
    pub id: u8,
    pub name: String,

    #[serde(default = "default_climate")]
    pub temperature: f32,

    #[serde(default = "default_climate")]
    pub rainfall: f32,

    /// Grass tint as `#RRGGBB`
    pub tint: String,

    /// Placeholder biomes keep their id but are never matched
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

fn default_climate() -> f32 {
    0.5
}

/// Parse a color field, naming the field on failure
pub(crate) fn parse_color(field: impl Into<String>, value: &str) -> Result<Argb, ConfigError> {
    value.parse().map_err(|source| ConfigError::Color {
        field: field.into(),
        source,
    })
}

impl CatalogConfig {
    /// Parse a catalog description from YAML
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load the catalog description from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Result<Self, ConfigError> {
        let content = loader.read_catalog_string()?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            source = %loader.catalog_source(),
            entries = config.entries.len(),
            biomes = config.biomes.len(),
            "Loaded catalog description"
        );
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
base_tint: { entry: "minecraft:grass_block" }
fallback: "minecraft:stone"
entries:
  - { name: "minecraft:stone", color: "#7D7D7D" }
  - { name: "minecraft:grass_block", color: "#939393", grass_like: true }
  - { name: "minecraft:red_stained_glass", color: "#80993333" }
biomes:
  - { id: 1, name: plains, temperature: 0.8, rainfall: 0.4, tint: "#91BD59" }
  - { id: 6, name: swamp, tint: "#6A7039", placeholder: true }
"##;

    #[test]
    fn test_parse_sample() {
        let config = CatalogConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(
            config.base_tint,
            BaseTint::Entry {
                entry: "minecraft:grass_block".to_string()
            }
        );
        assert_eq!(config.fallback.as_deref(), Some("minecraft:stone"));
        assert_eq!(config.entries.len(), 3);
        assert!(config.entries[1].grass_like);
        assert!(!config.entries[0].grass_like);
        assert_eq!(config.biomes[1].temperature, 0.5);
        assert!(config.biomes[1].placeholder);
    }

    #[test]
    fn test_base_tint_literal_color() {
        let yaml = "base_tint: \"#FFFFFF\"\nentries:\n  - { name: a, color: \"#000\" }\n";
        let config = CatalogConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_tint, BaseTint::Color("#FFFFFF".to_string()));
        assert!(config.biomes.is_empty());
        assert!(config.fallback.is_none());
    }

    #[test]
    fn test_missing_entries_is_parse_error() {
        let err = CatalogConfig::from_yaml("base_tint: \"#FFF\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = CatalogConfig::from_yaml(SAMPLE).unwrap();
        let again = CatalogConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_parse_color_names_field() {
        let err = parse_color("entries[0].color", "#XYZ").unwrap_err();
        assert!(err.to_string().starts_with("Invalid color for entries[0].color"));
        assert_eq!(parse_color("x", "#80112233").unwrap(), Argb(0x80112233));
    }
}
