use crate::brush::{PointerButton, ToolMode};
use crate::codec::Radix;
use crate::errors::Result;
use crate::session::EditorSession;

/// Everything a user interface can ask the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown {
        x: u16,
        y: u16,
        button: PointerButton,
    },
    PointerMove {
        x: u16,
        y: u16,
    },
    PointerUp {
        button: PointerButton,
    },
    PenWheel {
        delta_y: f32,
    },
    SetPenSize(u8),
    SetMode(ToolMode),
    SetRadix(Radix),
    Resize {
        width: String,
        height: String,
    },
    NudgeWidth(i32),
    NudgeHeight(i32),
    SelectPreset(String),
    Invert,
    Clear,
    RotateClockwise,
    FlipHorizontal,
    FlipVertical,
    Undo,
    GenerateCode,
    CopyCode,
    Import(String),
}

impl EditorEvent {
    /// Maps a key press to an event: `D` selects fill mode, `E` erase mode
    /// and `Ctrl+Z` undoes.
    pub fn from_key(key: char, ctrl: bool) -> Option<EditorEvent> {
        match (key.to_ascii_lowercase(), ctrl) {
            ('z', true) => Some(EditorEvent::Undo),
            ('d', false) => Some(EditorEvent::SetMode(ToolMode::Fill)),
            ('e', false) => Some(EditorEvent::SetMode(ToolMode::Erase)),
            _ => None,
        }
    }
}

/// What happened in response to an event, for the interface to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Cells were painted, erased, inverted, cleared or restored.
    CellsChanged(usize),
    /// A drawing gesture ended; `true` if it was added to the undo history.
    GestureEnded(bool),
    /// A brush or output setting changed.
    SettingsChanged,
    /// The grid got new dimensions or was transformed.
    GridReplaced { width: u16, height: u16 },
    /// A size step was out of range and ignored.
    Ignored,
    CodeGenerated(String),
    CodeCopied(String),
    Imported { changed: usize },
}

impl EditorSession {
    /// Applies a single event to the session.
    pub fn dispatch(&mut self, event: EditorEvent) -> Result<Outcome> {
        let outcome = match event {
            EditorEvent::PointerDown { x, y, button } => {
                Outcome::CellsChanged(self.pointer_down(x, y, button))
            }
            EditorEvent::PointerMove { x, y } => {
                Outcome::CellsChanged(self.pointer_move(x, y))
            }
            EditorEvent::PointerUp { button } => {
                Outcome::GestureEnded(self.pointer_up(button))
            }
            EditorEvent::PenWheel { delta_y } => {
                self.wheel_pen(delta_y);
                Outcome::SettingsChanged
            }
            EditorEvent::SetPenSize(size) => {
                self.set_pen_size(size);
                Outcome::SettingsChanged
            }
            EditorEvent::SetMode(mode) => {
                self.set_mode(mode);
                Outcome::SettingsChanged
            }
            EditorEvent::SetRadix(radix) => {
                self.set_radix(radix);
                Outcome::SettingsChanged
            }
            EditorEvent::Resize { width, height } => {
                self.resize(&width, &height)?;
                self.grid_replaced()
            }
            EditorEvent::NudgeWidth(delta) => {
                if self.nudge_width(delta)? {
                    self.grid_replaced()
                } else {
                    Outcome::Ignored
                }
            }
            EditorEvent::NudgeHeight(delta) => {
                if self.nudge_height(delta)? {
                    self.grid_replaced()
                } else {
                    Outcome::Ignored
                }
            }
            EditorEvent::SelectPreset(name) => {
                self.select_preset(&name)?;
                self.grid_replaced()
            }
            EditorEvent::Invert => Outcome::CellsChanged(self.invert()),
            EditorEvent::Clear => Outcome::CellsChanged(self.clear()),
            EditorEvent::RotateClockwise => {
                self.rotate_clockwise();
                self.grid_replaced()
            }
            EditorEvent::FlipHorizontal => {
                self.flip_horizontal();
                self.grid_replaced()
            }
            EditorEvent::FlipVertical => {
                self.flip_vertical();
                self.grid_replaced()
            }
            EditorEvent::Undo => Outcome::CellsChanged(self.undo()),
            EditorEvent::GenerateCode => {
                Outcome::CodeGenerated(self.generate_code().to_string())
            }
            EditorEvent::CopyCode => {
                Outcome::CodeCopied(self.copy_code()?.to_string())
            }
            EditorEvent::Import(text) => Outcome::Imported {
                changed: self.import(&text)?,
            },
        };

        Ok(outcome)
    }

    fn grid_replaced(&self) -> Outcome {
        Outcome::GridReplaced {
            width: self.grid().width(),
            height: self.grid().height(),
        }
    }
}
