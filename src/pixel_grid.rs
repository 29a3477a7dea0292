use std::fmt;

use image::{GrayImage, Luma};

use crate::errors::{GridError, Result};

/// Represents the monochrome grid the user paints on. Every cell is either
/// active or inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u16,
    height: u16,
    cells: Box<[bool]>,
}

impl PixelGrid {
    /// Creates a new grid with the given width and height where all the
    /// cells are inactive.
    pub fn new(width: u16, height: u16) -> Result<PixelGrid> {
        if width == 0 || height == 0 {
            return Err(GridError::invalid_dimensions(
                "grid size must be positive numbers",
            ));
        }

        Ok(PixelGrid {
            width,
            height,
            cells: vec![false; width as usize * height as usize]
                .into_boxed_slice(),
        })
    }

    /// Wraps already computed cells. The caller guarantees non-zero
    /// dimensions and `cells.len() == width * height`.
    pub(crate) fn from_cells(
        width: u16,
        height: u16,
        cells: Vec<bool>,
    ) -> PixelGrid {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(cells.len(), width as usize * height as usize);

        PixelGrid {
            width,
            height,
            cells: cells.into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterates over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width as usize)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    fn index_of(&self, x: u16, y: u16) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Gets the state of the cell at the given coordinates.
    pub fn get(&self, x: u16, y: u16) -> Result<bool> {
        let index = self.index_of(x, y)?;
        Ok(self.cells[index])
    }

    /// Sets the cell at the given coordinates to the given state.
    pub fn set(&mut self, x: u16, y: u16, active: bool) -> Result<()> {
        let index = self.index_of(x, y)?;
        self.cells[index] = active;
        Ok(())
    }

    /// Reallocates the grid with new dimensions. Active cells whose
    /// coordinates are still inside the grid stay active, everything else
    /// starts out inactive.
    pub fn resize(&mut self, new_width: u16, new_height: u16) -> Result<()> {
        let mut resized = PixelGrid::new(new_width, new_height)?;

        let keep_width = self.width.min(new_width) as usize;
        for y in 0..self.height.min(new_height) as usize {
            let src_start = y * self.width as usize;
            let dest_start = y * new_width as usize;
            resized.cells[dest_start..dest_start + keep_width]
                .copy_from_slice(&self.cells[src_start..src_start + keep_width]);
        }

        *self = resized;
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|&&active| active).count()
    }

    /// Toggles every cell.
    pub fn invert(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = !*cell;
        }
    }

    /// Deactivates every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Writes the grid to a PNG file, active cells white.
    ///
    /// # Arguments
    ///
    /// * `file_path` - The path to the output PNG file.
    /// * `scale` - The number of image pixels per cell side.
    pub fn write_to_png(&self, file_path: &str, scale: u32) -> Result<()> {
        let scale = scale.max(1);
        let mut img = GrayImage::new(
            self.width as u32 * scale,
            self.height as u32 * scale,
        );
        for (y, row) in self.rows().enumerate() {
            for (x, &active) in row.iter().enumerate() {
                let pixel_value = if active { 255 } else { 0 };
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(
                            x as u32 * scale + dx,
                            y as u32 * scale + dy,
                            Luma([pixel_value]),
                        );
                    }
                }
            }
        }
        img.save(file_path)?;
        Ok(())
    }
}

/// Renders the grid as rows of `#` (active) and `.` (inactive).
impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &active in row {
                write!(f, "{}", if active { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
