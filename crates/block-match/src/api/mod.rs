//! Public API for the block-match crate.
//!
//! [`MatcherBuilder`] assembles a decorator chain over a catalog and
//! [`MatchError`] unifies the crate's error types.

mod builder;
mod error;

pub use builder::MatcherBuilder;
pub use error::MatchError;
