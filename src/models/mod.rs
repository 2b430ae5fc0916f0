pub mod config;
pub mod host_ids;

pub use config::{BaseTint, BiomeConfig, CatalogConfig, EntryConfig};
pub use host_ids::HostIdMap;
