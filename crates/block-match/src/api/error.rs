//! Unified error type for the block-match public API.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::color::ParseColorError;

/// Unified error type for the block-match public API.
///
/// # Example
///
/// ```
/// use block_match::{Argb, MatchError};
///
/// fn parse(hex: &str) -> Result<Argb, MatchError> {
///     Ok(hex.parse::<Argb>()?)
/// }
///
/// assert!(parse("#12").is_err());
/// ```
#[derive(Debug, Error)]
pub enum MatchError {
    /// Catalog construction or lookup error
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
}
