//! Blockpaint - convert images into grids of block-palette entries
//!
//! Loads a catalog description, matches every pixel of an image against it
//! with the `block-match` crate and produces a grid of entries.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
