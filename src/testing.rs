use crate::pixel_grid::PixelGrid;

/// Builds a grid from rows of `#` (active) and `.` (inactive) characters.
///
/// # Panics
///
/// Panics if the rows are empty, have different lengths or contain other
/// characters.
pub fn grid_from_ascii(rows: &[&str]) -> PixelGrid {
    let height = rows.len();
    let width = rows.first().map(|row| row.len()).unwrap_or(0);
    let mut grid = PixelGrid::new(width as u16, height as u16)
        .expect("ASCII grid must not be empty");

    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            panic!("row {} has {} cells, expected {}", y, row.len(), width);
        }

        for (x, ch) in row.chars().enumerate() {
            let active = match ch {
                '#' => true,
                '.' => false,
                other => panic!("unexpected cell character '{}'", other),
            };
            grid.set(x as u16, y as u16, active).unwrap();
        }
    }

    grid
}

/// Asserts that two grids have the same dimensions and cells, printing both
/// as ASCII art when they differ.
pub fn assert_grid_eq(actual: &PixelGrid, expected: &PixelGrid) {
    if actual != expected {
        panic!(
            "assertion failed: `(left == right)`\n  left ({}x{}):\n{}\n right ({}x{}):\n{}",
            actual.width(),
            actual.height(),
            actual,
            expected.width(),
            expected.height(),
            expected
        );
    }
}
