//! Linear undo/redo log.
//!
//! A bounded ring of owned snapshots with a cursor into the next write
//! position. Recording past the cursor truncates the redo tail; recording
//! at capacity evicts the oldest entry. Cell and range records capture
//! their after-state lazily, on the first undo, so redo can replay the
//! mutation.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::types::{Cell, CellRange};

/// Maximum number of retained records.
pub const UNDO_CAPACITY: usize = 100;

/// One undoable mutation's snapshots.
#[derive(Debug, Clone)]
pub enum UndoRecord {
    /// A single cell's full state before (and, once undone, after) the
    /// mutation. `None` snapshots mean the slot was absent.
    Cell {
        row: usize,
        col: usize,
        before: Option<Cell>,
        after: Option<Box<Option<Cell>>>,
    },
    /// A rectangle of per-cell snapshots in row-major order.
    Range {
        range: CellRange,
        before: Vec<Option<Cell>>,
        after: Option<Vec<Option<Cell>>>,
    },
    /// Column widths over a span, oldest first.
    ColumnResize {
        start_col: usize,
        old: Vec<u16>,
        new: Vec<u16>,
    },
    /// Row heights over a span.
    RowResize {
        start_row: usize,
        old: Vec<u16>,
        new: Vec<u16>,
    },
}

/// The undo log ring.
#[derive(Debug, Default)]
pub struct UndoLog {
    records: VecDeque<UndoRecord>,
    cursor: usize,
}

impl UndoLog {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the next write; undo steps left, redo steps right.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Append a record taken just before a mutation. Drops any redo tail;
    /// evicts the oldest record at capacity.
    pub fn record(&mut self, record: UndoRecord) {
        self.records.truncate(self.cursor);
        if self.records.len() == UNDO_CAPACITY {
            self.records.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.records.push_back(record);
        self.cursor = self.records.len();
    }

    /// Step one record back: capture the current state as the record's
    /// after-state, then restore its before-state. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let Some(record) = self.records.get_mut(self.cursor) else {
            return false;
        };
        match record {
            UndoRecord::Cell {
                row,
                col,
                before,
                after,
            } => {
                if after.is_none() {
                    *after = Some(Box::new(grid.snapshot(*row, *col)));
                }
                grid.restore(*row, *col, before.clone());
            }
            UndoRecord::Range {
                range,
                before,
                after,
            } => {
                if after.is_none() {
                    *after = Some(range.iter().map(|(r, c)| grid.snapshot(r, c)).collect());
                }
                for ((row, col), snapshot) in range.iter().zip(before.iter()) {
                    grid.restore(row, col, snapshot.clone());
                }
            }
            UndoRecord::ColumnResize { start_col, old, .. } => {
                for (i, &width) in old.iter().enumerate() {
                    grid.set_col_width(*start_col + i, width);
                }
            }
            UndoRecord::RowResize { start_row, old, .. } => {
                for (i, &height) in old.iter().enumerate() {
                    grid.set_row_height(*start_row + i, height);
                }
            }
        }
        true
    }

    /// Step one record forward, restoring its after-state. Returns false
    /// when there is nothing to redo.
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        let Some(record) = self.records.get(self.cursor) else {
            return false;
        };
        match record {
            UndoRecord::Cell {
                row, col, after, ..
            } => {
                if let Some(after) = after {
                    grid.restore(*row, *col, (**after).clone());
                }
            }
            UndoRecord::Range { range, after, .. } => {
                if let Some(after) = after {
                    for ((row, col), snapshot) in range.iter().zip(after.iter()) {
                        grid.restore(row, col, snapshot.clone());
                    }
                }
            }
            UndoRecord::ColumnResize { start_col, new, .. } => {
                for (i, &width) in new.iter().enumerate() {
                    grid.set_col_width(*start_col + i, width);
                }
            }
            UndoRecord::RowResize { start_row, new, .. } => {
                for (i, &height) in new.iter().enumerate() {
                    grid.set_row_height(*start_row + i, height);
                }
            }
        }
        self.cursor += 1;
        true
    }
}
