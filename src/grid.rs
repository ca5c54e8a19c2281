//! The cell store: a dense two-dimensional container of lazily created
//! cells, plus per-column widths and per-row heights.

use crate::types::{Cell, CellContent, CellRange, FormulaCache};

/// Default grid dimensions.
pub const DEFAULT_ROWS: usize = 1000;
/// Default grid dimensions.
pub const DEFAULT_COLS: usize = 100;

/// Column width clamp range.
pub const MIN_COL_WIDTH: u16 = 1;
pub const MAX_COL_WIDTH: u16 = 50;
/// Row height clamp range.
pub const MIN_ROW_HEIGHT: u16 = 1;
pub const MAX_ROW_HEIGHT: u16 = 10;

const DEFAULT_COL_WIDTH: u16 = 10;
const DEFAULT_ROW_HEIGHT: u16 = 1;

/// Dense `rows × cols` grid. Each slot is independently absent or an owned
/// [`Cell`]; cells are created lazily on first write.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
    col_widths: Vec<u16>,
    row_heights: Vec<u16>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Grid {
    /// An empty grid of the given dimensions.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            col_widths: vec![DEFAULT_COL_WIDTH; cols],
            row_heights: vec![DEFAULT_ROW_HEIGHT; rows],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `(row, col)` lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Whether a range lies fully inside the grid.
    #[must_use]
    pub fn contains_range(&self, range: &CellRange) -> bool {
        range.end_row < self.rows && range.end_col < self.cols
    }

    fn slot(&self, row: usize, col: usize) -> Option<usize> {
        self.in_bounds(row, col).then(|| row * self.cols + col)
    }

    /// The cell at `(row, col)`, if present and in bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(self.slot(row, col)?)?.as_ref()
    }

    /// Mutable access to the cell at `(row, col)`, creating a default cell
    /// on first write. `None` only when out of bounds.
    pub fn get_or_create(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        let slot = self.slot(row, col)?;
        let entry = self.cells.get_mut(slot)?;
        Some(entry.get_or_insert_with(|| Cell::new(row, col)))
    }

    /// Write a number, preserving formatting. Out-of-range writes no-op.
    /// Returns whether anything changed.
    pub fn set_number(&mut self, row: usize, col: usize, value: f64) -> bool {
        match self.get_or_create(row, col) {
            Some(cell) => {
                cell.set_number(value);
                true
            }
            None => false,
        }
    }

    /// Write text, preserving formatting; alignment defaults to left.
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> bool {
        match self.get_or_create(row, col) {
            Some(cell) => {
                cell.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Write a formula, preserving formatting. The cache resets to
    /// unevaluated.
    pub fn set_formula(&mut self, row: usize, col: usize, source: &str) -> bool {
        match self.get_or_create(row, col) {
            Some(cell) => {
                cell.set_formula(source);
                true
            }
            None => false,
        }
    }

    /// Clear content at `(row, col)`, preserving formatting.
    pub fn clear_content(&mut self, row: usize, col: usize) -> bool {
        if let Some(slot) = self.slot(row, col) {
            if let Some(Some(cell)) = self.cells.get_mut(slot) {
                cell.clear_content();
                return true;
            }
        }
        false
    }

    /// Copy content, format, width, precision, and alignment from one cell
    /// into another. Positions are untouched.
    pub fn clone_content(src: &Cell, dst: &mut Cell) {
        dst.content = src.content.clone();
        dst.format = src.format.clone();
    }

    /// Sheet-level clone by indices. An absent source clears the
    /// destination's content.
    pub fn copy_cell(&mut self, src_row: usize, src_col: usize, dst_row: usize, dst_col: usize) -> bool {
        if !self.in_bounds(dst_row, dst_col) {
            return false;
        }
        match self.get(src_row, src_col).cloned() {
            Some(src) => {
                if let Some(dst) = self.get_or_create(dst_row, dst_col) {
                    Self::clone_content(&src, dst);
                    return true;
                }
                false
            }
            None => self.clear_content(dst_row, dst_col),
        }
    }

    /// Snapshot the whole cell state at `(row, col)` (absent slots give
    /// `None`). Used by the undo log and the clipboards.
    #[must_use]
    pub fn snapshot(&self, row: usize, col: usize) -> Option<Cell> {
        self.get(row, col).cloned()
    }

    /// Restore a snapshot taken by [`Grid::snapshot`], replacing the slot
    /// wholesale. The snapshot's position fields are rewritten to the
    /// target slot.
    pub fn restore(&mut self, row: usize, col: usize, snapshot: Option<Cell>) {
        let Some(slot) = self.slot(row, col) else {
            return;
        };
        if let Some(entry) = self.cells.get_mut(slot) {
            *entry = snapshot.map(|mut cell| {
                cell.row = row;
                cell.col = col;
                cell
            });
        }
    }

    /// Write a formula cell's evaluation cache. No-op for non-formula
    /// content.
    pub fn set_formula_cache(&mut self, row: usize, col: usize, result: FormulaCache) {
        let Some(slot) = self.slot(row, col) else {
            return;
        };
        if let Some(Some(cell)) = self.cells.get_mut(slot) {
            if let CellContent::Formula { cache, .. } = &mut cell.content {
                *cache = result;
            }
        }
    }

    /// Iterate all present cells, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    /// The minimal rectangle covering every cell with non-empty content,
    /// or `None` for a blank grid.
    #[must_use]
    pub fn used_rect(&self) -> Option<CellRange> {
        let mut rect: Option<CellRange> = None;
        for cell in self.iter_cells() {
            if cell.content.is_empty() {
                continue;
            }
            rect = Some(match rect {
                None => CellRange::single(cell.row, cell.col),
                Some(r) => CellRange {
                    start_row: r.start_row.min(cell.row),
                    start_col: r.start_col.min(cell.col),
                    end_row: r.end_row.max(cell.row),
                    end_col: r.end_col.max(cell.col),
                },
            });
        }
        rect
    }

    /// Drop every cell, keeping dimensions and sizing.
    pub fn clear_all(&mut self) {
        for slot in &mut self.cells {
            *slot = None;
        }
    }

    /// Display width of column `col`.
    #[must_use]
    pub fn col_width(&self, col: usize) -> u16 {
        self.col_widths.get(col).copied().unwrap_or(DEFAULT_COL_WIDTH)
    }

    /// Display height of row `row`.
    #[must_use]
    pub fn row_height(&self, row: usize) -> u16 {
        self.row_heights.get(row).copied().unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Adjust column `col` by `delta`, clamped to the legal range.
    /// Returns `(old, new)` when the column exists.
    pub fn resize_col(&mut self, col: usize, delta: i32) -> Option<(u16, u16)> {
        let width = self.col_widths.get_mut(col)?;
        let old = *width;
        *width = clamp_size(i32::from(old) + delta, MIN_COL_WIDTH, MAX_COL_WIDTH);
        Some((old, *width))
    }

    /// Adjust row `row` by `delta`, clamped to the legal range.
    pub fn resize_row(&mut self, row: usize, delta: i32) -> Option<(u16, u16)> {
        let height = self.row_heights.get_mut(row)?;
        let old = *height;
        *height = clamp_size(i32::from(old) + delta, MIN_ROW_HEIGHT, MAX_ROW_HEIGHT);
        Some((old, *height))
    }

    /// Set a column width directly (undo/redo path); clamped.
    pub fn set_col_width(&mut self, col: usize, width: u16) {
        if let Some(slot) = self.col_widths.get_mut(col) {
            *slot = width.clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
        }
    }

    /// Set a row height directly (undo/redo path); clamped.
    pub fn set_row_height(&mut self, row: usize, height: u16) {
        if let Some(slot) = self.row_heights.get_mut(row) {
            *slot = height.clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped first
fn clamp_size(value: i32, min: u16, max: u16) -> u16 {
    value.clamp(i32::from(min), i32::from(max)) as u16
}
