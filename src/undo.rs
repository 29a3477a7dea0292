use std::collections::{BTreeMap, VecDeque};

use log::{debug, warn};

use crate::pixel_grid::PixelGrid;

pub const DEFAULT_UNDO_CAPACITY: usize = 100;

/// The cell states captured during one drawing gesture, keyed by
/// coordinate. Only the state before the first change of each cell is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stroke {
    changes: BTreeMap<(u16, u16), bool>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the prior state of a cell unless it was already recorded.
    pub fn record(&mut self, x: u16, y: u16, prior: bool) {
        self.changes.entry((x, y)).or_insert(prior);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Bounded stack of committed strokes plus the stroke that is currently
/// being recorded. There is no redo.
#[derive(Debug)]
pub struct UndoLog {
    history: VecDeque<Stroke>,
    open: Option<Stroke>,
    capacity: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an undo log that keeps at most `capacity` strokes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            open: None,
            capacity: capacity.max(1),
        }
    }

    /// Opens a new empty stroke as the recording target.
    pub fn begin_stroke(&mut self) {
        if self.open.is_some() {
            warn!("a stroke was still open, discarding it");
        }
        self.open = Some(Stroke::new());
    }

    pub fn is_recording(&self) -> bool {
        self.open.is_some()
    }

    /// Records the prior state of a cell into the open stroke. Does nothing
    /// when no stroke is open.
    pub fn record(&mut self, x: u16, y: u16, prior: bool) {
        if let Some(stroke) = self.open.as_mut() {
            stroke.record(x, y, prior);
        }
    }

    /// Closes the open stroke. Returns `true` if it had changes and was
    /// pushed to the history, `false` if it was empty and got discarded.
    pub fn commit(&mut self) -> bool {
        let Some(stroke) = self.open.take() else {
            return false;
        };

        if stroke.is_empty() {
            debug!("discarding empty stroke");
            return false;
        }

        debug!("committing stroke with {} changes", stroke.len());
        self.history.push_back(stroke);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
        true
    }

    /// Reverts the most recent stroke directly on the grid. Returns the
    /// number of restored cells, zero when the history is empty.
    pub fn undo(&mut self, grid: &mut PixelGrid) -> usize {
        let Some(stroke) = self.history.pop_back() else {
            return 0;
        };

        let mut restored = 0;
        for (&(x, y), &prior) in &stroke.changes {
            match grid.set(x, y, prior) {
                Ok(()) => restored += 1,
                Err(e) => warn!("skipping undo of a cell: {}", e),
            }
        }
        debug!("undid stroke, restored {} cells", restored);
        restored
    }

    /// Number of committed strokes.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forgets all committed strokes. An open stroke keeps recording.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Forgets the committed strokes and drops the open one, if any.
    pub fn reset(&mut self) {
        if self.open.take().is_some() {
            debug!("dropping the open stroke");
        }
        self.history.clear();
    }
}
