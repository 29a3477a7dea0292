#![deny(warnings)]

pub mod brush;
pub mod codec;
pub mod config;
pub mod errors;
pub mod events;
pub mod pixel_grid;
pub mod resize;
pub mod script;
pub mod session;
pub mod testing;
pub mod transform;
pub mod undo;

pub use config::EditorConfig;
pub use errors::{GridError, Result};
pub use events::{EditorEvent, Outcome};
pub use pixel_grid::PixelGrid;
pub use session::EditorSession;
