//! Typed expression evaluation.
//!
//! Every expression evaluates to a [`Value`]: a number or a text string.
//! A formula whose result is text IS a string-result formula; no
//! out-of-band cache plumbing is needed.

use super::functions;
use super::{BinOp, CmpOp, Expr, FormulaError};
use crate::grid::Grid;
use crate::types::{CellContent, CellRange, Value};

/// Numeric equality tolerance used by comparisons, `MODE`, and `VLOOKUP`
/// exact matching.
pub(crate) const EQ_TOLERANCE: f64 = 1e-10;

/// Everything an evaluation can read.
pub struct EvalContext<'a> {
    pub grid: &'a Grid,
}

/// Evaluate an expression against the grid.
pub fn eval(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Value, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::Text(s.clone())),
        Expr::Ref { row, col } => ref_value(ctx, *row, *col),
        Expr::Range(range) => range_sum(ctx, range).map(Value::Number),
        Expr::Binary { op, left, right } => {
            let lhs = as_number(eval(left, ctx)?)?;
            let rhs = as_number(eval(right, ctx)?)?;
            apply_binary(*op, lhs, rhs).map(Value::Number)
        }
        Expr::Compare { op, left, right } => {
            let lhs = eval(left, ctx)?;
            let rhs = eval(right, ctx)?;
            Ok(Value::Number(compare(*op, &lhs, &rhs)))
        }
        Expr::Call { name, args } => functions::call(name, args, ctx),
    }
}

/// Read a referenced cell as a value: empty reads as 0, numbers and text
/// as themselves, formulas as their cached result (propagating cached
/// errors).
pub(crate) fn ref_value(
    ctx: &EvalContext<'_>,
    row: usize,
    col: usize,
) -> Result<Value, FormulaError> {
    if !ctx.grid.in_bounds(row, col) {
        return Err(FormulaError::Ref);
    }
    let Some(cell) = ctx.grid.get(row, col) else {
        return Ok(Value::Number(0.0));
    };
    match &cell.content {
        CellContent::Empty => Ok(Value::Number(0.0)),
        CellContent::Number(n) => Ok(Value::Number(*n)),
        CellContent::Text(s) => Ok(Value::Text(s.clone())),
        CellContent::Formula { cache, .. } => match cache {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(err)) => Err(*err),
            // Not yet evaluated this cycle; reads as the initial 0.
            None => Ok(Value::Number(0.0)),
        },
    }
}

/// Coerce a value to a number; text where a number is required is a
/// `Value` error.
pub(crate) fn as_number(value: Value) -> Result<f64, FormulaError> {
    value.as_number().ok_or(FormulaError::Value)
}

#[allow(clippy::float_cmp)] // exact-zero test is the division contract
fn apply_binary(op: BinOp, lhs: f64, rhs: f64) -> Result<f64, FormulaError> {
    match op {
        BinOp::Add => Ok(lhs + rhs),
        BinOp::Sub => Ok(lhs - rhs),
        BinOp::Mul => Ok(lhs * rhs),
        BinOp::Div => {
            if rhs == 0.0 {
                Err(FormulaError::DivZero)
            } else {
                Ok(lhs / rhs)
            }
        }
    }
}

/// Bare-range semantics: the sum of the range's numeric contents. Empty
/// cells read as 0, text and errored formulas contribute nothing.
fn range_sum(ctx: &EvalContext<'_>, range: &CellRange) -> Result<f64, FormulaError> {
    Ok(functions::collect_numbers(ctx, range)?.into_iter().sum())
}

/// Comparison over typed values. If either side is text, both sides are
/// compared lexicographically with the non-text side normalized to the
/// empty string; otherwise the comparison is numeric with the equality
/// tolerance. True is 1.0, false 0.0.
fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> f64 {
    let truth = if lhs.is_text() || rhs.is_text() {
        let l = text_view(lhs);
        let r = text_view(rhs);
        match op {
            CmpOp::Eq => l == r,
            CmpOp::Ne => l != r,
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
        }
    } else {
        let l = lhs.as_number().unwrap_or(0.0);
        let r = rhs.as_number().unwrap_or(0.0);
        match op {
            CmpOp::Eq => (l - r).abs() < EQ_TOLERANCE,
            CmpOp::Ne => (l - r).abs() >= EQ_TOLERANCE,
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
        }
    };
    if truth {
        1.0
    } else {
        0.0
    }
}

fn text_view(value: &Value) -> &str {
    match value {
        Value::Text(s) => s,
        Value::Number(_) => "",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;
    use crate::formula::parse_expression;

    fn eval_src(grid: &Grid, src: &str) -> Result<Value, FormulaError> {
        let expr = parse_expression(src)?;
        eval(&expr, &EvalContext { grid })
    }

    fn num(grid: &Grid, src: &str) -> f64 {
        match eval_src(grid, src).unwrap() {
            Value::Number(n) => n,
            Value::Text(s) => unreachable!("expected number, got {s:?}"),
        }
    }

    #[test]
    fn arithmetic_and_precedence() {
        let grid = Grid::new(10, 10);
        assert_eq!(num(&grid, "=1+2*3"), 7.0);
        assert_eq!(num(&grid, "=(1+2)*3"), 9.0);
        assert_eq!(num(&grid, "=10/4"), 2.5);
    }

    #[test]
    fn division_by_exact_zero_errors() {
        let grid = Grid::new(10, 10);
        assert_eq!(eval_src(&grid, "=1/0"), Err(FormulaError::DivZero));
        // A tiny but nonzero denominator stays a plain result.
        assert!(eval_src(&grid, "=1/1e-300").is_ok());
    }

    #[test]
    fn empty_reference_reads_zero() {
        let grid = Grid::new(10, 10);
        assert_eq!(num(&grid, "=A1+5"), 5.0);
    }

    #[test]
    fn text_reference_in_arithmetic_is_value_error() {
        let mut grid = Grid::new(10, 10);
        grid.set_text(0, 0, "abc");
        assert_eq!(eval_src(&grid, "=A1+1"), Err(FormulaError::Value));
    }

    #[test]
    fn out_of_bounds_reference_is_ref_error() {
        let grid = Grid::new(10, 10);
        assert_eq!(eval_src(&grid, "=Z99"), Err(FormulaError::Ref));
    }

    #[test]
    fn bare_range_sums() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 1.0);
        grid.set_number(1, 0, 2.0);
        grid.set_text(2, 0, "skip me");
        assert_eq!(num(&grid, "=A1:A4"), 3.0);
    }

    #[test]
    fn numeric_comparison_uses_tolerance() {
        let grid = Grid::new(10, 10);
        assert_eq!(num(&grid, "=1=1"), 1.0);
        assert_eq!(num(&grid, "=1<>1"), 0.0);
        assert_eq!(num(&grid, "=2>=3"), 0.0);
        assert_eq!(num(&grid, "=2<3"), 1.0);
    }

    #[test]
    fn string_comparison_against_cell_text() {
        let mut grid = Grid::new(10, 10);
        grid.set_text(0, 0, "Banana");
        assert_eq!(num(&grid, "=A1=\"Banana\""), 1.0);
        assert_eq!(num(&grid, "=A1<\"Cherry\""), 1.0);
        // Non-text LHS compares as the empty string.
        assert_eq!(num(&grid, "=B1=\"\""), 1.0);
    }
}
