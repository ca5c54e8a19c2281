//! Rectangular cell ranges.

use serde::{Deserialize, Serialize};

/// A closed rectangle of cells. Always canonical: `start_row <= end_row`
/// and `start_col <= end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    /// Build a range from two corners, canonicalizing inverted input.
    #[must_use]
    pub fn new(r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        Self {
            start_row: r0.min(r1),
            start_col: c0.min(c1),
            end_row: r0.max(r1),
            end_col: c0.max(c1),
        }
    }

    /// A 1×1 range covering a single cell.
    #[must_use]
    pub fn single(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    /// Number of rows in the rectangle.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    /// Number of columns in the rectangle.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Whether `(row, col)` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// Iterate all positions row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.start_col..=self.end_col;
        (self.start_row..=self.end_row)
            .flat_map(move |r| cols.clone().map(move |c| (r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_is_idempotent() {
        let range = CellRange::new(4, 3, 1, 0);
        let again = CellRange::new(range.start_row, range.start_col, range.end_row, range.end_col);
        assert_eq!(range, again);
        assert!(range.start_row <= range.end_row && range.start_col <= range.end_col);
    }

    #[test]
    fn iterates_row_major() {
        let range = CellRange::new(0, 0, 1, 1);
        let order: Vec<_> = range.iter().collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn contains_checks_bounds() {
        let range = CellRange::new(1, 1, 2, 3);
        assert!(range.contains(1, 1));
        assert!(range.contains(2, 3));
        assert!(!range.contains(0, 1));
        assert!(!range.contains(2, 4));
    }
}
