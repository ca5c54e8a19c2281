//! Recalculation driver.
//!
//! One `recalculate` pass parses every formula cell, orders the formula
//! cells topologically by their reference/range dependencies, and
//! evaluates each exactly once, so multi-level chains settle in a single
//! pass. Members of dependency cycles are marked with
//! [`FormulaError::Cycle`] and render as `#CYCLE!`.

use crate::formula::{eval, parse_expression, EvalContext, Expr, FormulaError};
use crate::grid::Grid;
use crate::types::{CellContent, CellRange};

struct Node {
    row: usize,
    col: usize,
    expr: Expr,
    dep_cells: Vec<(usize, usize)>,
    dep_ranges: Vec<CellRange>,
}

impl Node {
    fn depends_on(&self, row: usize, col: usize) -> bool {
        self.dep_cells.iter().any(|&(r, c)| r == row && c == col)
            || self.dep_ranges.iter().any(|range| range.contains(row, col))
    }
}

/// Evaluate every formula cell in the grid, refreshing its cache.
pub fn recalculate(grid: &mut Grid) {
    let sources: Vec<(usize, usize, String)> = grid
        .iter_cells()
        .filter_map(|cell| match &cell.content {
            CellContent::Formula { source, .. } => Some((cell.row, cell.col, source.clone())),
            _ => None,
        })
        .collect();

    let mut nodes = Vec::with_capacity(sources.len());
    for (row, col, source) in sources {
        match parse_expression(&source) {
            Ok(expr) => {
                let mut dep_cells = Vec::new();
                let mut dep_ranges = Vec::new();
                expr.collect_deps(&mut dep_cells, &mut dep_ranges);
                nodes.push(Node {
                    row,
                    col,
                    expr,
                    dep_cells,
                    dep_ranges,
                });
            }
            Err(err) => grid.set_formula_cache(row, col, Some(Err(err))),
        }
    }

    // Kahn's algorithm over formula-to-formula edges. `iter_cells` yields
    // row-major order, so scanning for ready nodes in index order keeps
    // evaluation deterministic.
    let mut indegree: Vec<usize> = nodes
        .iter()
        .map(|node| {
            nodes
                .iter()
                .filter(|dep| node.depends_on(dep.row, dep.col))
                .count()
        })
        .collect();

    let mut done = vec![false; nodes.len()];
    loop {
        let Some(next) = indegree
            .iter()
            .enumerate()
            .position(|(i, &deg)| deg == 0 && !done.get(i).copied().unwrap_or(true))
        else {
            break;
        };
        if let Some(slot) = done.get_mut(next) {
            *slot = true;
        }
        if let Some(node) = nodes.get(next) {
            let result = eval(&node.expr, &EvalContext { grid });
            grid.set_formula_cache(node.row, node.col, Some(result));

            // Release this node's dependents.
            let (row, col) = (node.row, node.col);
            for (i, other) in nodes.iter().enumerate() {
                if other.depends_on(row, col) {
                    if let Some(deg) = indegree.get_mut(i) {
                        *deg = deg.saturating_sub(1);
                    }
                }
            }
        }
    }

    // Whatever never became ready sits on a cycle.
    for (i, node) in nodes.iter().enumerate() {
        if !done.get(i).copied().unwrap_or(true) {
            grid.set_formula_cache(node.row, node.col, Some(Err(FormulaError::Cycle)));
        }
    }
}
