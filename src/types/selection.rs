//! Range selection state.

use serde::{Deserialize, Serialize};

use super::CellRange;

/// The active selection: the user's two anchors, kept raw so the presenter
/// can distinguish the anchored cell from the rest of the range.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Selection {
    active: bool,
    start_row: usize,
    start_col: usize,
    current_row: usize,
    current_col: usize,
}

impl Selection {
    /// Anchor a new selection at `(row, col)`.
    pub fn start(&mut self, row: usize, col: usize) {
        self.active = true;
        self.start_row = row;
        self.start_col = col;
        self.current_row = row;
        self.current_col = col;
    }

    /// Move the current endpoint, keeping the anchor.
    pub fn extend(&mut self, row: usize, col: usize) {
        self.current_row = row;
        self.current_col = col;
    }

    /// Deactivate the selection.
    pub fn clear(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The anchor cell, as set by [`Selection::start`].
    #[must_use]
    pub fn anchor(&self) -> (usize, usize) {
        (self.start_row, self.start_col)
    }

    /// The moving endpoint, as set by [`Selection::extend`].
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.current_row, self.current_col)
    }

    /// Canonical bounds of the selection, if active.
    #[must_use]
    pub fn range(&self) -> Option<CellRange> {
        self.active.then(|| {
            CellRange::new(
                self.start_row,
                self.start_col,
                self.current_row,
                self.current_col,
            )
        })
    }

    /// Whether `(row, col)` lies inside the active selection.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range().is_some_and(|r| r.contains(row, col))
    }
}
