use block_match::{CatalogError, MatchError, ParseColorError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Catalog read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid color for {field}: {source}")]
    Color {
        field: String,
        #[source]
        source: ParseColorError,
    },

    #[error("Unknown entry: {0}")]
    UnknownEntry(String),

    #[error("Duplicate entry name: {0}")]
    DuplicateName(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("Pixel count mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Matcher error: {0}")]
    Match(#[from] MatchError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

impl From<CatalogError> for ConvertError {
    fn from(e: CatalogError) -> Self {
        ConvertError::Match(MatchError::Catalog(e))
    }
}
