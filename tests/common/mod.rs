//! Shared helpers for integration tests.

#![allow(dead_code)]

use termsheet::Sheet;

/// A default-sized sheet (1000x100).
pub fn empty_sheet() -> Sheet {
    Sheet::default()
}

/// Write `values` down column `col` starting at row 0.
pub fn fill_column(sheet: &mut Sheet, col: usize, values: &[f64]) {
    for (row, &value) in values.iter().enumerate() {
        sheet.set_number(row, col, value);
    }
}

/// Write `texts` down column `col` starting at row 0.
pub fn fill_column_text(sheet: &mut Sheet, col: usize, texts: &[&str]) {
    for (row, &text) in texts.iter().enumerate() {
        sheet.set_text(row, col, text);
    }
}
