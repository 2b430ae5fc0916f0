pub mod catalog_loader;
pub mod converter;

pub use catalog_loader::LoadedCatalog;
pub use converter::{BlockGrid, Cell, ConvertMode, ConvertOptions, Converter, GridDocument};
