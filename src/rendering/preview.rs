//! Renders a block grid back to colors

use block_match::color::composite_over;
use block_match::{Argb, Catalog};

use crate::services::BlockGrid;

/// Color each cell the way it would look once placed.
///
/// Overlay cells show the composite of the overlay on its base. Cells with a
/// biome show the biome's combined tint, other cells the stored entry color.
/// Empty cells and unknown ids are transparent.
pub fn render_preview(grid: &BlockGrid, catalog: &Catalog) -> Vec<Argb> {
    let color = |id| catalog.color_of(id).unwrap_or(Argb::TRANSPARENT);

    grid.cells
        .iter()
        .map(|cell| {
            let Some(entry) = cell.entry else {
                return Argb::TRANSPARENT;
            };
            let base = match cell.biome.and_then(|b| catalog.biome(b)) {
                Some(biome) if catalog.is_grass_like(entry) => biome.tint_combined,
                _ => color(entry),
            };
            match cell.overlay {
                Some(top) => composite_over(color(top), base),
                None => base,
            }
        })
        .collect()
}
