//! Custom assertion helpers for grid tests.

use blockpaint::services::{BlockGrid, GridDocument};

/// Assert that a grid has consistent dimensions
pub fn assert_grid_shape(grid: &BlockGrid, width: u32, height: u32) {
    assert_eq!(grid.width, width, "grid width");
    assert_eq!(grid.height, height, "grid height");
    assert_eq!(
        grid.cells.len(),
        (width * height) as usize,
        "cell count should be width * height"
    );
}

/// Assert that every entry a document uses has a palette name
pub fn assert_palette_complete(doc: &GridDocument) {
    for cell in &doc.cells {
        for id in cell.entry.into_iter().chain(cell.overlay) {
            assert!(
                doc.palette.contains_key(&id),
                "entry {id} missing from palette"
            );
        }
    }
}

/// Assert that bytes look like a PNG
pub fn assert_png_bytes(bytes: &[u8]) {
    assert!(bytes.len() > 8, "PNG too short: {} bytes", bytes.len());
    assert_eq!(&bytes[1..4], b"PNG", "Should be a PNG file");
}
