use log::{debug, info};

use crate::brush::{self, PenSize, PointerButton, ToolMode};
use crate::codec::{self, ExportOptions, Radix};
use crate::config::EditorConfig;
use crate::errors::{GridError, Result};
use crate::pixel_grid::PixelGrid;
use crate::resize::{self, SizePreset};
use crate::transform;
use crate::undo::UndoLog;

/// Owns everything the editor works on: the grid, the undo log, the brush
/// settings, the export settings and the last generated code.
///
/// Freehand strokes, invert, clear and import are undoable. Resizing,
/// rotating and flipping are not; they drop the undo history because the
/// recorded coordinates no longer describe the grid.
#[derive(Debug)]
pub struct EditorSession {
    grid: PixelGrid,
    undo: UndoLog,
    pen: PenSize,
    mode: ToolMode,
    primary_down: bool,
    secondary_down: bool,
    export: ExportOptions,
    max_dimension: u16,
    generated: Option<String>,
}

impl EditorSession {
    pub fn new(config: &EditorConfig) -> Result<EditorSession> {
        config.validate()?;

        Ok(EditorSession {
            grid: PixelGrid::new(config.width, config.height)?,
            undo: UndoLog::with_capacity(config.undo_capacity),
            pen: PenSize::new(config.pen_size),
            mode: config.mode,
            primary_down: false,
            secondary_down: false,
            export: ExportOptions {
                radix: config.radix,
                element_type: config.element_type.clone(),
                array_name: config.array_name.clone(),
            },
            max_dimension: config.max_dimension,
            generated: None,
        })
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn is_active(&self, x: u16, y: u16) -> Result<bool> {
        self.grid.get(x, y)
    }

    pub fn pen_size(&self) -> PenSize {
        self.pen
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn radix(&self) -> Radix {
        self.export.radix
    }

    /// Number of strokes that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// True while a pointer button is held down over the grid.
    pub fn is_drawing(&self) -> bool {
        self.primary_down || self.secondary_down
    }

    pub fn generated_code(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        debug!("tool mode {:?}", mode);
        self.mode = mode;
    }

    pub fn set_pen_size(&mut self, size: u8) {
        self.pen = PenSize::new(size);
    }

    /// Grows the pen on wheel up and shrinks it on wheel down.
    pub fn wheel_pen(&mut self, delta_y: f32) -> PenSize {
        self.pen = self.pen.wheel(delta_y);
        self.pen
    }

    pub fn set_radix(&mut self, radix: Radix) {
        self.export.radix = radix;
    }

    // Gestures

    /// Starts (or continues) a drawing gesture at a cell. Presses outside of
    /// the grid are ignored. Returns the number of changed cells.
    pub fn pointer_down(
        &mut self,
        x: u16,
        y: u16,
        button: PointerButton,
    ) -> usize {
        if !self.grid.contains(x, y) {
            return 0;
        }

        match button {
            PointerButton::Primary => self.primary_down = true,
            PointerButton::Secondary => self.secondary_down = true,
        }
        if !self.undo.is_recording() {
            self.undo.begin_stroke();
        }

        self.paint_at(x, y, button)
    }

    /// Paints with the held button when the pointer enters a cell. The
    /// primary button wins when both are held.
    pub fn pointer_move(&mut self, x: u16, y: u16) -> usize {
        let button = if self.primary_down {
            PointerButton::Primary
        } else if self.secondary_down {
            PointerButton::Secondary
        } else {
            return 0;
        };
        if !self.grid.contains(x, y) {
            return 0;
        }

        self.paint_at(x, y, button)
    }

    /// Releases a button. Once no button is held the gesture ends and its
    /// stroke is committed; returns `true` if the stroke made it into the
    /// history.
    pub fn pointer_up(&mut self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary_down = false,
            PointerButton::Secondary => self.secondary_down = false,
        }

        if self.is_drawing() {
            return false;
        }
        self.undo.commit()
    }

    fn paint_at(&mut self, x: u16, y: u16, button: PointerButton) -> usize {
        brush::paint_or_erase(
            &mut self.grid,
            &mut self.undo,
            x as i32,
            y as i32,
            self.pen,
            self.mode,
            button,
        )
    }

    /// Runs `operation` inside its own stroke, or inside the current one if
    /// a gesture is in progress.
    fn recorded<T>(
        &mut self,
        operation: impl FnOnce(&mut PixelGrid, &mut UndoLog) -> T,
    ) -> T {
        let own_stroke = !self.undo.is_recording();
        if own_stroke {
            self.undo.begin_stroke();
        }

        let result = operation(&mut self.grid, &mut self.undo);

        if own_stroke {
            self.undo.commit();
        }
        result
    }

    // Whole-grid edits

    /// Toggles every cell. Undoable.
    pub fn invert(&mut self) -> usize {
        self.recorded(|grid, undo| {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let index = y as usize * grid.width() as usize + x as usize;
                    undo.record(x, y, grid.cells()[index]);
                }
            }
            grid.invert();
            grid.cells().len()
        })
    }

    /// Deactivates every cell and hides the generated code. Undoable.
    pub fn clear(&mut self) -> usize {
        self.generated = None;
        self.recorded(|grid, undo| {
            let mut changed = 0;
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    if grid.get(x, y) == Ok(true) {
                        undo.record(x, y, true);
                        changed += 1;
                    }
                }
            }
            grid.clear();
            changed
        })
    }

    /// Reverts the most recent stroke. Ignored while a gesture is in
    /// progress, the open stroke would otherwise mix with the restored one.
    pub fn undo(&mut self) -> usize {
        if self.is_drawing() {
            debug!("ignoring undo during a gesture");
            return 0;
        }
        self.undo.undo(&mut self.grid)
    }

    // Structural changes

    /// Swaps in a grid with a new layout. A gesture in progress ends here and
    /// its stroke is dropped along with the history.
    fn replace_grid(&mut self, grid: PixelGrid) {
        info!(
            "grid is now {}x{}, dropping {} undo steps",
            grid.width(),
            grid.height(),
            self.undo.len()
        );
        self.grid = grid;
        self.undo.reset();
        self.primary_down = false;
        self.secondary_down = false;
        self.generated = None;
    }

    pub fn rotate_clockwise(&mut self) {
        let rotated = transform::rotate_clockwise(&self.grid);
        self.replace_grid(rotated);
    }

    pub fn flip_horizontal(&mut self) {
        let flipped = transform::flip_horizontal(&self.grid);
        self.replace_grid(flipped);
    }

    pub fn flip_vertical(&mut self) {
        let flipped = transform::flip_vertical(&self.grid);
        self.replace_grid(flipped);
    }

    /// Resizes to the typed dimensions, keeping the content at coordinates
    /// that exist in both sizes.
    pub fn resize(&mut self, width: &str, height: &str) -> Result<()> {
        let (width, height) =
            resize::parse_dimensions(width, height, self.max_dimension)?;
        self.resize_to(width, height)
    }

    pub fn resize_to(&mut self, width: u16, height: u16) -> Result<()> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(GridError::invalid_dimensions(format!(
                "grid size is too big (max {}x{})",
                self.max_dimension, self.max_dimension
            )));
        }

        let mut grid = self.grid.clone();
        grid.resize(width, height)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Grows or shrinks the width by `delta`. Out of range steps are
    /// ignored and return `false`.
    pub fn nudge_width(&mut self, delta: i32) -> Result<bool> {
        match resize::nudge(self.grid.width(), delta, self.max_dimension) {
            Some(width) => {
                self.resize_to(width, self.grid.height())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Grows or shrinks the height by `delta`. Out of range steps are
    /// ignored and return `false`.
    pub fn nudge_height(&mut self, delta: i32) -> Result<bool> {
        match resize::nudge(self.grid.height(), delta, self.max_dimension) {
            Some(height) => {
                self.resize_to(self.grid.width(), height)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Switches to an empty square grid of the named preset.
    pub fn select_preset(&mut self, name: &str) -> Result<SizePreset> {
        let preset: SizePreset = name.parse()?;
        if preset.side() > self.max_dimension {
            return Err(GridError::invalid_dimensions(format!(
                "{} does not fit into {}x{}",
                preset, self.max_dimension, self.max_dimension
            )));
        }

        let grid = PixelGrid::new(preset.side(), preset.side())?;
        self.replace_grid(grid);
        Ok(preset)
    }

    // Import and export

    /// Builds the array declaration for the current grid and keeps it for
    /// copying.
    pub fn generate_code(&mut self) -> &str {
        let code = codec::export(&self.grid, &self.export);
        debug!("generated {} bytes of code", code.len());
        self.generated.insert(code)
    }

    /// The code to hand to the clipboard.
    pub fn copy_code(&self) -> Result<&str> {
        self.generated_code().ok_or(GridError::NoContentToExport)
    }

    /// Repaints the grid from pasted code. Undoable. On any error the grid
    /// and the undo history are left as they were.
    pub fn import(&mut self, input: &str) -> Result<usize> {
        let bytes = codec::parse_bytes(input)?;
        let changed =
            self.recorded(|grid, undo| codec::decode_into(grid, undo, &bytes))?;
        info!("imported {} bytes, {} cells changed", bytes.len(), changed);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::EditorSession;
    use crate::brush::{PointerButton, ToolMode};
    use crate::codec::Radix;
    use crate::config::EditorConfig;
    use crate::errors::GridError;
    use crate::testing::{assert_grid_eq, grid_from_ascii};

    fn session(width: u16, height: u16) -> EditorSession {
        EditorSession::new(&EditorConfig {
            width,
            height,
            ..EditorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn new_session_uses_config() {
        let session = EditorSession::new(&EditorConfig::default()).unwrap();
        assert_eq!(session.grid().width(), 16);
        assert_eq!(session.pen_size().get(), 1);
        assert_eq!(session.mode(), ToolMode::Fill);
        assert_eq!(session.radix(), Radix::Hex);
        assert_eq!(session.generated_code(), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EditorConfig {
            width: 0,
            ..EditorConfig::default()
        };
        assert!(EditorSession::new(&config).is_err());
    }

    /// A gesture spans down, moves and up and becomes a single undo step.
    #[test]
    fn gesture_is_one_stroke() {
        let mut session = session(4, 2);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_move(1, 0);
        session.pointer_move(2, 1);
        assert!(session.is_drawing());
        assert!(session.pointer_up(PointerButton::Primary));
        assert_grid_eq(session.grid(), &grid_from_ascii(&["##..", "..#."]));
        assert_eq!(session.undo_depth(), 1);

        session.undo();
        assert_eq!(session.grid().active_count(), 0);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn moves_without_a_held_button_do_nothing() {
        let mut session = session(4, 2);
        assert_eq!(session.pointer_move(1, 1), 0);
        assert!(!session.pointer_up(PointerButton::Primary));
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn press_outside_the_grid_is_ignored() {
        let mut session = session(4, 2);
        assert_eq!(session.pointer_down(4, 0, PointerButton::Primary), 0);
        assert!(!session.is_drawing());
    }

    /// A gesture that changes nothing leaves no undo step behind.
    #[test]
    fn empty_gesture_is_discarded() {
        let mut session = session(4, 2);
        session.pointer_down(0, 0, PointerButton::Secondary);
        assert!(!session.pointer_up(PointerButton::Secondary));
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn secondary_button_erases_in_fill_mode() {
        let mut session = session(3, 1);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_move(1, 0);
        session.pointer_move(2, 0);
        session.pointer_up(PointerButton::Primary);

        session.pointer_down(1, 0, PointerButton::Secondary);
        session.pointer_up(PointerButton::Secondary);
        assert_grid_eq(session.grid(), &grid_from_ascii(&["#.#"]));

        session.set_mode(ToolMode::Erase);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);
        session.pointer_down(1, 0, PointerButton::Secondary);
        session.pointer_up(PointerButton::Secondary);
        assert_grid_eq(session.grid(), &grid_from_ascii(&[".##"]));
    }

    /// The stroke only ends when the last held button is released.
    #[test]
    fn stroke_ends_with_the_last_button() {
        let mut session = session(3, 1);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_down(2, 0, PointerButton::Secondary);
        assert!(!session.pointer_up(PointerButton::Primary));
        assert!(session.is_drawing());
        assert!(session.pointer_up(PointerButton::Secondary));
        assert_eq!(session.undo_depth(), 1);
    }

    #[test]
    fn wheel_changes_pen_size() {
        let mut session = session(8, 8);
        for _ in 0..20 {
            session.wheel_pen(-1.0);
        }
        assert_eq!(session.pen_size().get(), 10);
        session.wheel_pen(1.0);
        assert_eq!(session.pen_size().get(), 9);
    }

    #[test]
    fn invert_and_clear_are_undoable() {
        let mut session = session(2, 2);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);

        assert_eq!(session.invert(), 4);
        assert_grid_eq(session.grid(), &grid_from_ascii(&[".#", "##"]));
        assert_eq!(session.clear(), 3);
        assert_eq!(session.grid().active_count(), 0);
        assert_eq!(session.undo_depth(), 3);

        session.undo();
        assert_grid_eq(session.grid(), &grid_from_ascii(&[".#", "##"]));
        session.undo();
        assert_grid_eq(session.grid(), &grid_from_ascii(&["#.", ".."]));
    }

    #[test]
    fn clear_on_empty_grid_leaves_no_undo_step() {
        let mut session = session(2, 2);
        assert_eq!(session.clear(), 0);
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn copy_requires_generated_code() {
        let mut session = session(8, 2);
        assert_eq!(session.copy_code(), Err(GridError::NoContentToExport));

        session.generate_code();
        assert_eq!(
            session.copy_code(),
            Ok("uint8_t bitmap[] = {\n    0x00, 0x00\n};")
        );

        session.clear();
        assert_eq!(session.copy_code(), Err(GridError::NoContentToExport));
    }

    #[test]
    fn generate_uses_the_selected_radix() {
        let mut session = session(8, 1);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);
        session.set_radix(Radix::Binary);
        assert_eq!(
            session.generate_code(),
            "uint8_t bitmap[] = {\n    B10000000\n};"
        );
    }

    #[test]
    fn import_is_undoable() {
        let mut session = session(8, 2);
        assert_eq!(session.import("{0xf0, 0x0f}"), Ok(8));
        assert_grid_eq(
            session.grid(),
            &grid_from_ascii(&["####....", "....####"]),
        );
        session.undo();
        assert_eq!(session.grid().active_count(), 0);
    }

    /// A failed import touches neither the grid nor the history.
    #[test]
    fn failed_import_changes_nothing() {
        let mut session = session(8, 2);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);
        let before = session.grid().clone();

        assert_eq!(session.import("   "), Err(GridError::EmptyImportInput));
        assert!(matches!(
            session.import("0xff, 0xqq"),
            Err(GridError::UnparseableToken { .. })
        ));
        assert_eq!(
            session.import("0xff"),
            Err(GridError::SizeMismatch {
                expected: 2,
                actual: 1
            })
        );

        assert_grid_eq(session.grid(), &before);
        assert_eq!(session.undo_depth(), 1);
    }

    #[test]
    fn resize_keeps_content_and_drops_history() {
        let mut session = session(4, 4);
        session.pointer_down(1, 1, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);
        session.generate_code();

        session.resize("2", "3").unwrap();
        assert_grid_eq(session.grid(), &grid_from_ascii(&["..", ".#", ".."]));
        assert_eq!(session.undo_depth(), 0);
        assert_eq!(session.generated_code(), None);
    }

    #[test]
    fn invalid_resize_keeps_the_grid() {
        let mut session = session(4, 4);
        assert!(session.resize("0", "4").is_err());
        assert!(session.resize("x", "4").is_err());
        assert!(session.resize("129", "4").is_err());
        assert_eq!(session.grid().width(), 4);
    }

    #[test]
    fn nudging_respects_limits() {
        let mut session = session(1, 128);
        assert_eq!(session.nudge_width(-1), Ok(false));
        assert_eq!(session.nudge_height(1), Ok(false));
        assert_eq!(session.nudge_width(1), Ok(true));
        assert_eq!(session.grid().width(), 2);
    }

    /// Selecting a preset starts over with an empty square grid.
    #[test]
    fn preset_resets_the_grid() {
        let mut session = session(4, 4);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);

        session.select_preset("uint32_t").unwrap();
        assert_eq!(session.grid().width(), 32);
        assert_eq!(session.grid().height(), 32);
        assert_eq!(session.grid().active_count(), 0);
        assert_eq!(session.undo_depth(), 0);
        assert!(session.select_preset("int").is_err());
    }

    #[test]
    fn transforms_drop_history() {
        let mut session = session(4, 2);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);

        session.rotate_clockwise();
        assert_eq!(session.grid().width(), 2);
        assert_eq!(session.is_active(1, 0), Ok(true));
        assert_eq!(session.undo_depth(), 0);

        session.flip_horizontal();
        assert_eq!(session.is_active(0, 0), Ok(true));
        session.flip_vertical();
        assert_eq!(session.is_active(0, 3), Ok(true));
    }

    /// A rotation in the middle of a gesture ends it. Nothing from the old
    /// layout is committed, so a later undo has nothing to revert.
    #[test]
    fn transform_during_a_gesture_drops_the_open_stroke() {
        let mut session = session(4, 4);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.rotate_clockwise();
        assert!(!session.is_drawing());
        assert_eq!(session.pointer_move(1, 1), 0);
        assert!(!session.pointer_up(PointerButton::Primary));
        assert_eq!(session.undo_depth(), 0);

        assert_eq!(session.undo(), 0);
        assert_grid_eq(
            session.grid(),
            &grid_from_ascii(&["...#", "....", "....", "...."]),
        );
    }

    #[test]
    fn undo_is_ignored_while_drawing() {
        let mut session = session(3, 1);
        session.pointer_down(0, 0, PointerButton::Primary);
        session.pointer_up(PointerButton::Primary);
        session.pointer_down(2, 0, PointerButton::Primary);

        assert_eq!(session.undo(), 0);
        assert_grid_eq(session.grid(), &grid_from_ascii(&["#.#"]));

        assert!(session.pointer_up(PointerButton::Primary));
        assert_eq!(session.undo(), 1);
        assert_grid_eq(session.grid(), &grid_from_ascii(&["#.."]));
        assert_eq!(session.undo(), 1);
        assert_eq!(session.grid().active_count(), 0);
    }

    #[test]
    fn extreme_nudges_are_ignored() {
        let mut session = session(4, 4);
        assert_eq!(session.nudge_width(i32::MAX), Ok(false));
        assert_eq!(session.nudge_height(i32::MIN), Ok(false));
        assert_eq!(session.grid().width(), 4);
        assert_eq!(session.grid().height(), 4);
    }
}
