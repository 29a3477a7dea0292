use serde::{Deserialize, Serialize};

use crate::pixel_grid::PixelGrid;
use crate::undo::UndoLog;

pub const MIN_PEN_SIZE: u8 = 1;
pub const MAX_PEN_SIZE: u8 = 10;

/// Side length control of the square brush, always within
/// `MIN_PEN_SIZE..=MAX_PEN_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PenSize(u8);

impl PenSize {
    /// Creates a pen size, clamping the value into the allowed range.
    pub fn new(size: u8) -> PenSize {
        PenSize(size.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// How far the brush reaches from its center cell.
    pub fn radius(self) -> i32 {
        (self.0 / 2) as i32
    }

    /// Moves the pen size by `delta` steps, stopping at the limits.
    pub fn step(self, delta: i32) -> PenSize {
        let size = (self.0 as i32)
            .saturating_add(delta)
            .clamp(MIN_PEN_SIZE as i32, MAX_PEN_SIZE as i32);
        PenSize(size as u8)
    }

    /// Applies a wheel gesture: scrolling up (negative delta) grows the pen,
    /// scrolling down shrinks it.
    pub fn wheel(self, delta_y: f32) -> PenSize {
        if delta_y < 0.0 {
            self.step(1)
        } else {
            self.step(-1)
        }
    }
}

impl Default for PenSize {
    fn default() -> Self {
        PenSize(MIN_PEN_SIZE)
    }
}

/// The drawing tool that the primary pointer button uses.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Fill,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Decides whether a held button activates (`true`) or clears cells. The
/// secondary button always does the opposite of the current mode.
pub fn resolve_action(mode: ToolMode, button: PointerButton) -> bool {
    matches!(
        (mode, button),
        (ToolMode::Fill, PointerButton::Primary)
            | (ToolMode::Erase, PointerButton::Secondary)
    )
}

/// Sets every cell of the square brush centered at `(cx, cy)` to `active`.
/// Cells outside the grid are skipped. Cells that change get their prior
/// state recorded into the open stroke of `undo`; cells that are already in
/// the desired state are left alone and not recorded.
///
/// Returns the number of cells that changed.
pub fn paint(
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
    cx: i32,
    cy: i32,
    pen: PenSize,
    active: bool,
) -> usize {
    let radius = pen.radius();
    let min_x = cx.saturating_sub(radius).max(0);
    let max_x = cx.saturating_add(radius).min(grid.width() as i32 - 1);
    let min_y = cy.saturating_sub(radius).max(0);
    let max_y = cy.saturating_add(radius).min(grid.height() as i32 - 1);

    let mut changed = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (x, y) = (x as u16, y as u16);
            let Ok(current) = grid.get(x, y) else {
                continue;
            };
            if current == active {
                continue;
            }

            undo.record(x, y, current);
            if grid.set(x, y, active).is_ok() {
                changed += 1;
            }
        }
    }

    changed
}

/// Activates the cells under the brush.
pub fn fill(
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
    cx: i32,
    cy: i32,
    pen: PenSize,
) -> usize {
    paint(grid, undo, cx, cy, pen, true)
}

/// Clears the cells under the brush.
pub fn erase(
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
    cx: i32,
    cy: i32,
    pen: PenSize,
) -> usize {
    paint(grid, undo, cx, cy, pen, false)
}

/// Fills or erases depending on the tool mode and the held button.
pub fn paint_or_erase(
    grid: &mut PixelGrid,
    undo: &mut UndoLog,
    cx: i32,
    cy: i32,
    pen: PenSize,
    mode: ToolMode,
    button: PointerButton,
) -> usize {
    paint(grid, undo, cx, cy, pen, resolve_action(mode, button))
}
