//! Whole-grid geometric transforms. Each one reads a snapshot of the source
//! grid and builds a new one.

use crate::pixel_grid::PixelGrid;

fn build(
    width: u16,
    height: u16,
    source: impl Fn(u16, u16) -> bool,
) -> PixelGrid {
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            cells.push(source(x, y));
        }
    }
    PixelGrid::from_cells(width, height, cells)
}

fn cell(grid: &PixelGrid, x: u16, y: u16) -> bool {
    grid.cells()[y as usize * grid.width() as usize + x as usize]
}

/// Rotates the grid by 90 degrees clockwise. The width and height swap:
/// column `x` of the source, read bottom to top, becomes row `x`.
pub fn rotate_clockwise(grid: &PixelGrid) -> PixelGrid {
    let old_height = grid.height();
    build(grid.height(), grid.width(), |x, y| {
        cell(grid, y, old_height - 1 - x)
    })
}

/// Mirrors the grid along its vertical axis.
pub fn flip_horizontal(grid: &PixelGrid) -> PixelGrid {
    let width = grid.width();
    build(width, grid.height(), |x, y| cell(grid, width - 1 - x, y))
}

/// Mirrors the grid along its horizontal axis.
pub fn flip_vertical(grid: &PixelGrid) -> PixelGrid {
    let height = grid.height();
    build(grid.width(), height, |x, y| cell(grid, x, height - 1 - y))
}
