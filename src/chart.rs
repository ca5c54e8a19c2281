//! Chart data extraction.
//!
//! The engine side of charting: convert a selected range into a typed
//! sample stream for the plotting collaborator. Plotting itself lives
//! outside the engine.

use serde::Serialize;

use crate::grid::Grid;
use crate::numfmt::display_value;
use crate::types::{CellContent, CellRange, Value};

/// Supported chart shapes, as named by the chart directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Scatter,
}

impl ChartKind {
    /// Parse a chart directive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "line" => Some(Self::Line),
            "bar" => Some(Self::Bar),
            "pie" => Some(Self::Pie),
            "scatter" => Some(Self::Scatter),
            _ => None,
        }
    }
}

/// Typed sample stream extracted from a range.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    /// Per-row labels: the display string of the leading cell when it is
    /// text.
    pub labels: Vec<Option<String>>,
    /// Numeric samples, row-major across the value columns.
    pub values: Vec<f64>,
    /// `(x, y)` pairs from the first two columns; populated for scatter.
    pub points: Vec<(f64, f64)>,
}

/// The numeric view of a cell for sampling: numbers and numeric formula
/// results only.
fn sample(grid: &Grid, row: usize, col: usize) -> Option<f64> {
    match grid.get(row, col).map(|cell| &cell.content)? {
        CellContent::Number(n) => Some(*n),
        CellContent::Formula {
            cache: Some(Ok(Value::Number(n))),
            ..
        } => Some(*n),
        _ => None,
    }
}

/// Extract a chart series from `range`.
///
/// When the range is at least two columns wide and its first column holds
/// text, that column supplies labels and the remaining columns supply
/// values; otherwise every numeric cell in the range is a value. Scatter
/// charts additionally pair the first two columns as `(x, y)`.
#[must_use]
pub fn series_from_range(grid: &Grid, range: &CellRange, kind: ChartKind) -> ChartSeries {
    let first_col_is_labels = range.cols() >= 2
        && (range.start_row..=range.end_row).any(|row| {
            grid.get(row, range.start_col)
                .is_some_and(|cell| matches!(cell.content, CellContent::Text(_)))
        });

    let value_start_col = if first_col_is_labels {
        range.start_col + 1
    } else {
        range.start_col
    };

    let mut labels = Vec::with_capacity(range.rows());
    let mut values = Vec::new();
    for row in range.start_row..=range.end_row {
        if first_col_is_labels {
            let label = grid
                .get(row, range.start_col)
                .filter(|cell| matches!(cell.content, CellContent::Text(_)))
                .map(display_value);
            labels.push(label);
        } else {
            labels.push(None);
        }
        for col in value_start_col..=range.end_col {
            if let Some(v) = sample(grid, row, col) {
                values.push(v);
            }
        }
    }

    let mut points = Vec::new();
    if kind == ChartKind::Scatter && range.cols() >= 2 {
        for row in range.start_row..=range.end_row {
            if let (Some(x), Some(y)) = (
                sample(grid, row, range.start_col),
                sample(grid, row, range.start_col + 1),
            ) {
                points.push((x, y));
            }
        }
    }

    ChartSeries {
        kind,
        labels,
        values,
        points,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn plain_numeric_range_samples_row_major() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 1.0);
        grid.set_number(0, 1, 2.0);
        grid.set_number(1, 0, 3.0);
        let series = series_from_range(&grid, &CellRange::new(0, 0, 1, 1), ChartKind::Bar);
        assert_eq!(series.values, vec![1.0, 2.0, 3.0]);
        assert!(series.points.is_empty());
    }

    #[test]
    fn leading_text_column_becomes_labels() {
        let mut grid = Grid::new(10, 10);
        grid.set_text(0, 0, "apples");
        grid.set_number(0, 1, 10.0);
        grid.set_text(1, 0, "pears");
        grid.set_number(1, 1, 20.0);
        let series = series_from_range(&grid, &CellRange::new(0, 0, 1, 1), ChartKind::Pie);
        assert_eq!(
            series.labels,
            vec![Some("apples".to_string()), Some("pears".to_string())]
        );
        assert_eq!(series.values, vec![10.0, 20.0]);
    }

    #[test]
    fn scatter_pairs_the_first_two_columns() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 1.0);
        grid.set_number(0, 1, 4.0);
        grid.set_number(1, 0, 2.0);
        grid.set_number(1, 1, 8.0);
        let series = series_from_range(&grid, &CellRange::new(0, 0, 1, 1), ChartKind::Scatter);
        assert_eq!(series.points, vec![(1.0, 4.0), (2.0, 8.0)]);
    }
}
