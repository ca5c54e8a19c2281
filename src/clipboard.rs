//! Single-cell and range clipboards.
//!
//! Both clipboards hold deep clones: content plus formatting, never
//! positions. The range clipboard is replaced atomically by each range
//! copy.

use crate::grid::Grid;
use crate::types::{Cell, CellRange};

/// Deep clone of one cell. `None` means the clipboard is empty (the last
/// copied slot was absent).
#[derive(Debug, Clone, Default)]
pub struct CellClipboard {
    cell: Option<Cell>,
}

impl CellClipboard {
    /// Snapshot the cell at `(row, col)`. Copying an absent slot empties
    /// the clipboard.
    pub fn copy_from(&mut self, grid: &Grid, row: usize, col: usize) {
        self.cell = grid.snapshot(row, col);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// Clone the held cell onto `(row, col)`: content, formatting, and
    /// sizing. Returns false when the clipboard is empty or the target is
    /// out of bounds.
    pub fn paste_into(&self, grid: &mut Grid, row: usize, col: usize) -> bool {
        let Some(src) = &self.cell else {
            return false;
        };
        match grid.get_or_create(row, col) {
            Some(dst) => {
                Grid::clone_content(src, dst);
                true
            }
            None => false,
        }
    }
}

/// Rectangular snapshot of a copied range.
#[derive(Debug, Clone, Default)]
pub struct RangeClipboard {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl RangeClipboard {
    /// Snapshot every cell inside `range`, replacing any previous
    /// snapshot.
    pub fn copy_from(&mut self, grid: &Grid, range: &CellRange) {
        self.rows = range.rows();
        self.cols = range.cols();
        self.cells = range.iter().map(|(r, c)| grid.snapshot(r, c)).collect();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The rectangle this clipboard would cover pasted at `(row, col)`,
    /// clipped to the grid. `None` when empty or fully off-grid.
    #[must_use]
    pub fn target_rect(&self, grid: &Grid, row: usize, col: usize) -> Option<CellRange> {
        if self.is_empty() || !grid.in_bounds(row, col) {
            return None;
        }
        let end_row = (row + self.rows - 1).min(grid.rows() - 1);
        let end_col = (col + self.cols - 1).min(grid.cols() - 1);
        Some(CellRange::new(row, col, end_row, end_col))
    }

    /// Paste the snapshot with its top-left corner at `(row, col)`.
    /// Positions overflowing the grid are silently skipped. Absent
    /// snapshot slots clear the target's content, keeping its formatting.
    pub fn paste_into(&self, grid: &mut Grid, row: usize, col: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        for (i, snapshot) in self.cells.iter().enumerate() {
            let dst_row = row + i / self.cols;
            let dst_col = col + i % self.cols;
            if !grid.in_bounds(dst_row, dst_col) {
                continue;
            }
            match snapshot {
                Some(src) => {
                    if let Some(dst) = grid.get_or_create(dst_row, dst_col) {
                        Grid::clone_content(src, dst);
                    }
                }
                None => {
                    grid.clear_content(dst_row, dst_col);
                }
            }
        }
        true
    }
}
