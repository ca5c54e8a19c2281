//! The engine facade.
//!
//! `Sheet` owns the grid, the cursor, the selection, both clipboards, and
//! the undo log, and exposes the mutation surface the presenter drives.
//! Every user-initiated mutation follows the same sequence: record one
//! undo entry, mutate, mark dirty, and recalculate when the mutation is
//! content-affecting.

use crate::chart::{series_from_range, ChartKind, ChartSeries};
use crate::clipboard::{CellClipboard, RangeClipboard};
use crate::command::{ColorTarget, Command, CsvMode};
use crate::csv_io;
use crate::error::Result;
use crate::grid::Grid;
use crate::numfmt::display_value;
use crate::recalc::recalculate;
use crate::types::{Cell, CellFormat, CellKind, CellRange, NumberFormat, Selection};
use crate::undo::{UndoLog, UndoRecord};

/// Which clipboard the most recent copy filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LastCopy {
    #[default]
    None,
    Cell,
    Range,
}

/// Result of executing a [`Command`].
#[derive(Debug)]
pub enum CommandOutcome {
    /// Request to leave the run loop.
    Exit,
    /// Command completed; optional status message.
    Done(Option<String>),
    /// Sample stream for the chart collaborator.
    Chart(ChartSeries),
    /// Nothing happened; show this notice.
    Notice(String),
}

/// An interactive spreadsheet: grid, cursor, selection, clipboards, undo.
#[derive(Debug, Default)]
pub struct Sheet {
    grid: Grid,
    selection: Selection,
    cell_clipboard: CellClipboard,
    range_clipboard: RangeClipboard,
    last_copy: LastCopy,
    undo_log: UndoLog,
    cursor_row: usize,
    cursor_col: usize,
    needs_recalc: bool,
}

impl Sheet {
    /// A sheet over an empty grid of the given dimensions.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            selection: Selection::default(),
            cell_clipboard: CellClipboard::default(),
            range_clipboard: RangeClipboard::default(),
            last_copy: LastCopy::None,
            undo_log: UndoLog::default(),
            cursor_row: 0,
            cursor_col: 0,
            needs_recalc: false,
        }
    }

    // ---- Read API ----

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The formatter's output for `(row, col)`; absent cells display "".
    #[must_use]
    pub fn display_value(&self, row: usize, col: usize) -> String {
        self.grid.get(row, col).map(display_value).unwrap_or_default()
    }

    /// Content discriminant at `(row, col)`.
    #[must_use]
    pub fn cell_kind(&self, row: usize, col: usize) -> CellKind {
        self.grid
            .get(row, col)
            .map_or(CellKind::Empty, |cell| cell.content.kind())
    }

    /// The formatting of `(row, col)`; defaults for absent cells.
    #[must_use]
    pub fn cell_format(&self, row: usize, col: usize) -> CellFormat {
        self.grid
            .get(row, col)
            .map_or_else(CellFormat::default, |cell| cell.format.clone())
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn is_in_selection(&self, row: usize, col: usize) -> bool {
        self.selection.contains(row, col)
    }

    #[must_use]
    pub fn column_width(&self, col: usize) -> u16 {
        self.grid.col_width(col)
    }

    #[must_use]
    pub fn row_height(&self, row: usize) -> u16 {
        self.grid.row_height(row)
    }

    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    #[must_use]
    pub fn needs_recalc(&self) -> bool {
        self.needs_recalc
    }

    /// Undo log length and cursor, for status display.
    #[must_use]
    pub fn undo_state(&self) -> (usize, usize) {
        (self.undo_log.len(), self.undo_log.cursor())
    }

    // ---- Cursor and selection ----

    /// Move the cursor by a delta, clamped to the grid. With `extend`,
    /// start or extend the selection (the shift contract); without it the
    /// selection clears.
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize, extend: bool) {
        if extend && !self.selection.is_active() {
            self.selection.start(self.cursor_row, self.cursor_col);
        }
        self.cursor_row = step(self.cursor_row, d_row, self.grid.rows());
        self.cursor_col = step(self.cursor_col, d_col, self.grid.cols());
        if extend {
            self.selection.extend(self.cursor_row, self.cursor_col);
        } else {
            self.selection.clear();
        }
    }

    pub fn start_selection(&mut self, row: usize, col: usize) {
        self.selection.start(row, col);
    }

    pub fn extend_selection(&mut self, row: usize, col: usize) {
        self.selection.extend(row, col);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- Content mutations ----

    pub fn set_number(&mut self, row: usize, col: usize, value: f64) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        self.grid.set_number(row, col, value);
        self.needs_recalc = true;
    }

    pub fn set_text(&mut self, row: usize, col: usize, text: &str) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        self.grid.set_text(row, col, text);
        self.needs_recalc = true;
    }

    pub fn set_formula(&mut self, row: usize, col: usize, source: &str) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        self.grid.set_formula(row, col, source);
        self.needs_recalc = true;
    }

    /// Clear the cell's content, keeping its formatting.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        self.grid.clear_content(row, col);
        self.needs_recalc = true;
    }

    /// Clear the cell under the cursor (the `x` key).
    pub fn clear_current(&mut self) {
        self.clear_cell(self.cursor_row, self.cursor_col);
    }

    /// Sheet-level clone by indices; an absent source clears the
    /// destination.
    pub fn copy_cell(&mut self, src_row: usize, src_col: usize, dst_row: usize, dst_col: usize) {
        if !self.grid.in_bounds(dst_row, dst_col) {
            return;
        }
        self.record_cell(dst_row, dst_col);
        self.grid.copy_cell(src_row, src_col, dst_row, dst_col);
        self.needs_recalc = true;
    }

    // ---- Clipboards ----

    /// Copy: the selection into the range clipboard when one is active,
    /// the cursor cell into the single-cell clipboard otherwise.
    pub fn copy(&mut self) {
        if let Some(range) = self.selection.range() {
            self.range_clipboard.copy_from(&self.grid, &range);
            self.last_copy = LastCopy::Range;
        } else {
            self.cell_clipboard
                .copy_from(&self.grid, self.cursor_row, self.cursor_col);
            self.last_copy = LastCopy::Cell;
        }
    }

    /// Paste whichever clipboard the last copy filled, at the cursor.
    /// Returns the status notice when there is nothing to paste.
    pub fn paste(&mut self) -> Option<String> {
        match self.last_copy {
            LastCopy::None => Some("Nothing to paste".to_string()),
            LastCopy::Cell => {
                if self.cell_clipboard.is_empty() {
                    return Some("Nothing to paste".to_string());
                }
                self.record_cell(self.cursor_row, self.cursor_col);
                self.cell_clipboard
                    .paste_into(&mut self.grid, self.cursor_row, self.cursor_col);
                self.needs_recalc = true;
                self.recalculate();
                None
            }
            LastCopy::Range => self.paste_range(self.cursor_row, self.cursor_col),
        }
    }

    /// Copy the current selection into the range clipboard.
    pub fn copy_range(&mut self) -> Option<String> {
        let Some(range) = self.selection.range() else {
            return Some("No range selected".to_string());
        };
        self.range_clipboard.copy_from(&self.grid, &range);
        self.last_copy = LastCopy::Range;
        None
    }

    /// Paste the range clipboard with its top-left corner at `(row, col)`,
    /// clipping at the grid edge, then recalculate.
    pub fn paste_range(&mut self, row: usize, col: usize) -> Option<String> {
        let Some(target) = self.range_clipboard.target_rect(&self.grid, row, col) else {
            return Some("Nothing to paste".to_string());
        };
        self.record_range(target);
        self.range_clipboard.paste_into(&mut self.grid, row, col);
        self.needs_recalc = true;
        self.recalculate();
        None
    }

    // ---- Formatting ----

    /// Apply a format to one cell. Formatting changes are undoable but do
    /// not dirty the calculation state.
    pub fn set_format(&mut self, row: usize, col: usize, format: NumberFormat) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        if let Some(cell) = self.grid.get_or_create(row, col) {
            cell.format.format = format;
        }
    }

    /// Apply a format across the selection. Returns a notice when no
    /// range is selected.
    pub fn format_selection(&mut self, format: NumberFormat) -> Option<String> {
        let Some(range) = self.selection.range() else {
            return Some("No range selected".to_string());
        };
        self.record_range(range);
        for (row, col) in range.iter() {
            if let Some(cell) = self.grid.get_or_create(row, col) {
                cell.format.format = format;
            }
        }
        None
    }

    /// Advance a date/time/datetime cell to the next style in the cycle.
    pub fn cycle_datetime_format(&mut self, row: usize, col: usize) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        if let Some(cell) = self.grid.get_or_create(row, col) {
            cell.format.format = cell.format.format.cycled();
        }
    }

    pub fn set_precision(&mut self, row: usize, col: usize, precision: u8) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        if let Some(cell) = self.grid.get_or_create(row, col) {
            cell.format.precision = precision;
        }
    }

    pub fn set_text_color(&mut self, row: usize, col: usize, color: Option<u8>) {
        self.set_color(row, col, ColorTarget::Text, color);
    }

    pub fn set_background_color(&mut self, row: usize, col: usize, color: Option<u8>) {
        self.set_color(row, col, ColorTarget::Background, color);
    }

    fn set_color(&mut self, row: usize, col: usize, target: ColorTarget, color: Option<u8>) {
        if !self.grid.in_bounds(row, col) {
            return;
        }
        self.record_cell(row, col);
        if let Some(cell) = self.grid.get_or_create(row, col) {
            match target {
                ColorTarget::Text => cell.format.text_color = color,
                ColorTarget::Background => cell.format.background_color = color,
            }
        }
    }

    fn color_selection(&mut self, target: ColorTarget, color: Option<u8>) -> Option<String> {
        let Some(range) = self.selection.range() else {
            return Some("No range selected".to_string());
        };
        self.record_range(range);
        for (row, col) in range.iter() {
            if let Some(cell) = self.grid.get_or_create(row, col) {
                match target {
                    ColorTarget::Text => cell.format.text_color = color,
                    ColorTarget::Background => cell.format.background_color = color,
                }
            }
        }
        None
    }

    // ---- Sizing ----

    /// Resize a span of columns by `delta`, clamping indices into the
    /// grid and widths into their legal range. One undo record per call.
    pub fn resize_columns(&mut self, c0: usize, c1: usize, delta: i32) {
        let last = self.grid.cols().saturating_sub(1);
        let start = c0.min(last);
        let end = c1.min(last).max(start);
        let mut old = Vec::with_capacity(end - start + 1);
        let mut new = Vec::with_capacity(end - start + 1);
        for col in start..=end {
            if let Some((before, after)) = self.grid.resize_col(col, delta) {
                old.push(before);
                new.push(after);
            }
        }
        self.undo_log.record(UndoRecord::ColumnResize {
            start_col: start,
            old,
            new,
        });
    }

    /// Resize a span of rows by `delta`; same clamping as columns.
    pub fn resize_rows(&mut self, r0: usize, r1: usize, delta: i32) {
        let last = self.grid.rows().saturating_sub(1);
        let start = r0.min(last);
        let end = r1.min(last).max(start);
        let mut old = Vec::with_capacity(end - start + 1);
        let mut new = Vec::with_capacity(end - start + 1);
        for row in start..=end {
            if let Some((before, after)) = self.grid.resize_row(row, delta) {
                old.push(before);
                new.push(after);
            }
        }
        self.undo_log.record(UndoRecord::RowResize {
            start_row: start,
            old,
            new,
        });
    }

    // ---- Undo / redo / recalc ----

    /// Undo the last mutation and recalculate. False when the log is
    /// exhausted.
    pub fn undo(&mut self) -> bool {
        let undone = self.undo_log.undo(&mut self.grid);
        if undone {
            self.needs_recalc = true;
            self.recalculate();
        }
        undone
    }

    /// Redo the last undone mutation and recalculate.
    pub fn redo(&mut self) -> bool {
        let redone = self.undo_log.redo(&mut self.grid);
        if redone {
            self.needs_recalc = true;
            self.recalculate();
        }
        redone
    }

    /// Evaluate every formula cell and refresh its cache.
    pub fn recalculate(&mut self) {
        recalculate(&mut self.grid);
        self.needs_recalc = false;
    }

    /// Recalculate only when a content mutation is pending.
    pub fn recalculate_if_needed(&mut self) {
        if self.needs_recalc {
            self.recalculate();
        }
    }

    // ---- CSV ----

    /// Save to a CSV file.
    pub fn save_csv(&self, path: &str, mode: CsvMode) -> Result<()> {
        csv_io::save_path(&self.grid, path, mode)
    }

    /// Replace the grid contents from a CSV file, then recalculate.
    /// Not undoable.
    pub fn load_csv(&mut self, path: &str, mode: CsvMode) -> Result<()> {
        csv_io::load_path(&mut self.grid, path, mode)?;
        self.needs_recalc = true;
        self.recalculate();
        Ok(())
    }

    // ---- Commands ----

    /// Execute a parsed command against the sheet.
    pub fn execute(&mut self, command: &Command) -> Result<CommandOutcome> {
        match command {
            Command::Quit => Ok(CommandOutcome::Exit),
            Command::SaveCsv { path, mode } => {
                self.save_csv(path, *mode)?;
                Ok(CommandOutcome::Done(Some(format!("saved {path}"))))
            }
            Command::LoadCsv { path, mode } => {
                self.load_csv(path, *mode)?;
                Ok(CommandOutcome::Done(Some(format!("loaded {path}"))))
            }
            Command::Format { format, range } => {
                if *range {
                    match self.format_selection(*format) {
                        Some(notice) => Ok(CommandOutcome::Notice(notice)),
                        None => Ok(CommandOutcome::Done(None)),
                    }
                } else {
                    self.set_format(self.cursor_row, self.cursor_col, *format);
                    Ok(CommandOutcome::Done(None))
                }
            }
            Command::Color {
                target,
                color,
                range,
            } => {
                if *range {
                    match self.color_selection(*target, Some(*color)) {
                        Some(notice) => Ok(CommandOutcome::Notice(notice)),
                        None => Ok(CommandOutcome::Done(None)),
                    }
                } else {
                    self.set_color(self.cursor_row, self.cursor_col, *target, Some(*color));
                    Ok(CommandOutcome::Done(None))
                }
            }
            Command::Chart(kind) => match self.chart_series(*kind) {
                Some(series) => Ok(CommandOutcome::Chart(series)),
                None => Ok(CommandOutcome::Notice("No range selected".to_string())),
            },
        }
    }

    /// The current selection as a chart sample stream.
    #[must_use]
    pub fn chart_series(&self, kind: ChartKind) -> Option<ChartSeries> {
        let range = self.selection.range()?;
        Some(series_from_range(&self.grid, &range, kind))
    }

    /// All present cells, for serialization in the CLI.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter_cells()
    }

    // ---- Internals ----

    fn record_cell(&mut self, row: usize, col: usize) {
        self.undo_log.record(UndoRecord::Cell {
            row,
            col,
            before: self.grid.snapshot(row, col),
            after: None,
        });
    }

    fn record_range(&mut self, range: CellRange) {
        let before = range
            .iter()
            .map(|(r, c)| self.grid.snapshot(r, c))
            .collect();
        self.undo_log.record(UndoRecord::Range {
            range,
            before,
            after: None,
        });
    }
}

/// Step an index by a signed delta, clamped to `[0, len)`.
fn step(index: usize, delta: isize, len: usize) -> usize {
    let moved = if delta.is_negative() {
        index.saturating_sub(delta.unsigned_abs())
    } else {
        index.saturating_add(delta.unsigned_abs())
    };
    moved.min(len.saturating_sub(1))
}
