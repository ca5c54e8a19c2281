//! Built-in formula functions.

use super::eval::{as_number, eval, ref_value, EvalContext, EQ_TOLERANCE};
use super::{Expr, FormulaError};
use crate::types::{CellContent, CellRange, Value};

/// Dispatch a function call. `name` is uppercase. Unknown names and arity
/// violations are parse errors.
pub(crate) fn call(
    name: &str,
    args: &[Expr],
    ctx: &EvalContext<'_>,
) -> Result<Value, FormulaError> {
    match name {
        "SUM" => sum(args, ctx).map(Value::Number),
        "AVG" => avg(args, ctx).map(Value::Number),
        "MAX" => fold(args, ctx, f64::max).map(Value::Number),
        "MIN" => fold(args, ctx, f64::min).map(Value::Number),
        "MEDIAN" => median(args, ctx).map(Value::Number),
        "MODE" => mode(args, ctx).map(Value::Number),
        "POWER" => power(args, ctx).map(Value::Number),
        "IF" => if_fn(args, ctx),
        "VLOOKUP" => vlookup(args, ctx),
        _ => Err(FormulaError::Parse),
    }
}

/// Collect the numeric contents of a range: empty cells contribute 0,
/// text contributes nothing, errored formula caches are skipped.
pub(crate) fn collect_numbers(
    ctx: &EvalContext<'_>,
    range: &CellRange,
) -> Result<Vec<f64>, FormulaError> {
    if !ctx.grid.contains_range(range) {
        return Err(FormulaError::Ref);
    }
    let mut values = Vec::with_capacity(range.rows() * range.cols());
    for (row, col) in range.iter() {
        match ctx.grid.get(row, col).map(|cell| &cell.content) {
            None | Some(CellContent::Empty) => values.push(0.0),
            Some(CellContent::Number(n)) => values.push(*n),
            Some(CellContent::Text(_)) => {}
            Some(CellContent::Formula { cache, .. }) => match cache {
                Some(Ok(Value::Number(n))) => values.push(*n),
                Some(Ok(Value::Text(_))) | Some(Err(_)) => {}
                None => values.push(0.0),
            },
        }
    }
    Ok(values)
}

/// Gather values from aggregate arguments: ranges expand to their
/// collected contents, scalars evaluate numerically.
fn gather(args: &[Expr], ctx: &EvalContext<'_>) -> Result<Vec<f64>, FormulaError> {
    if args.is_empty() {
        return Err(FormulaError::Parse);
    }
    let mut values = Vec::new();
    for arg in args {
        match arg {
            Expr::Range(range) => values.extend(collect_numbers(ctx, range)?),
            other => values.push(as_number(eval(other, ctx)?)?),
        }
    }
    Ok(values)
}

fn sum(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    Ok(gather(args, ctx)?.into_iter().sum())
}

fn avg(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    let values = gather(args, ctx)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Ok(values.iter().sum::<f64>() / count)
}

fn fold(
    args: &[Expr],
    ctx: &EvalContext<'_>,
    pick: fn(f64, f64) -> f64,
) -> Result<f64, FormulaError> {
    let values = gather(args, ctx)?;
    Ok(values.into_iter().reduce(pick).unwrap_or(0.0))
}

fn median(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    let mut values = gather(args, ctx)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Ok(values.get(mid).copied().unwrap_or(0.0))
    } else {
        let low = values.get(mid - 1).copied().unwrap_or(0.0);
        let high = values.get(mid).copied().unwrap_or(0.0);
        Ok((low + high) / 2.0)
    }
}

/// First value (in input order) whose frequency is maximal; equality is
/// tolerance-based. All-distinct input returns the first value.
fn mode(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    let values = gather(args, ctx)?;
    let mut best = 0.0;
    let mut best_count = 0usize;
    for &candidate in &values {
        let count = values
            .iter()
            .filter(|&&v| (v - candidate).abs() < EQ_TOLERANCE)
            .count();
        // Strictly greater keeps the first occurrence on ties.
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    Ok(best)
}

fn power(args: &[Expr], ctx: &EvalContext<'_>) -> Result<f64, FormulaError> {
    let [base, exponent] = args else {
        return Err(FormulaError::Parse);
    };
    let base = as_number(eval(base, ctx)?)?;
    let exponent = as_number(eval(exponent, ctx)?)?;
    Ok(base.powf(exponent))
}

/// `IF(cond, true, false)`: only the taken branch evaluates; a string
/// branch makes the whole formula a string result.
#[allow(clippy::float_cmp)] // truthiness is nonzero, as in the comparators
fn if_fn(args: &[Expr], ctx: &EvalContext<'_>) -> Result<Value, FormulaError> {
    let [cond, when_true, when_false] = args else {
        return Err(FormulaError::Parse);
    };
    let cond = as_number(eval(cond, ctx)?)?;
    let branch = if cond != 0.0 { when_true } else { when_false };
    eval(branch, ctx)
}

/// `VLOOKUP(key, range, col_index, [exact])`: search the first column of
/// the range, return the scalar from `col_index` (one-based) in the
/// matched row.
#[allow(clippy::float_cmp)] // exact flag is nonzero truthiness
fn vlookup(args: &[Expr], ctx: &EvalContext<'_>) -> Result<Value, FormulaError> {
    let (key_expr, range, col_expr, exact_expr) = match args {
        [key, Expr::Range(range), col] => (key, range, col, None),
        [key, Expr::Range(range), col, exact] => (key, range, col, Some(exact)),
        [_, _, _] | [_, _, _, _] => return Err(FormulaError::Ref),
        _ => return Err(FormulaError::Parse),
    };

    if !ctx.grid.contains_range(range) {
        return Err(FormulaError::Ref);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let col_index = {
        let n = as_number(eval(col_expr, ctx)?)?;
        if n < 1.0 {
            return Err(FormulaError::Ref);
        }
        n as usize
    };
    let result_col = range.start_col + col_index - 1;
    if result_col > range.end_col {
        return Err(FormulaError::Ref);
    }

    let key = eval(key_expr, ctx)?;
    let exact = match exact_expr {
        Some(expr) => as_number(eval(expr, ctx)?)? != 0.0,
        None => false,
    };

    let matched_row = match &key {
        Value::Text(key_text) => lookup_text(ctx, range, key_text),
        Value::Number(key_num) => lookup_number(ctx, range, *key_num, exact),
    };

    let Some(row) = matched_row else {
        return Err(FormulaError::Na);
    };
    ref_value(ctx, row, result_col)
}

/// String keys match cells whose content is text or a string-result
/// formula; numeric cells never match.
fn lookup_text(ctx: &EvalContext<'_>, range: &CellRange, key: &str) -> Option<usize> {
    (range.start_row..=range.end_row).find(|&row| {
        ctx.grid
            .get(row, range.start_col)
            .and_then(|cell| cell.text_value())
            .is_some_and(|text| text == key)
    })
}

/// Numeric keys: exact uses the equality tolerance; approximate takes the
/// largest first-column value less than or equal to the key.
fn lookup_number(
    ctx: &EvalContext<'_>,
    range: &CellRange,
    key: f64,
    exact: bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in range.start_row..=range.end_row {
        let value = match ctx.grid.get(row, range.start_col).map(|cell| &cell.content) {
            Some(CellContent::Number(n)) => *n,
            Some(CellContent::Formula {
                cache: Some(Ok(Value::Number(n))),
                ..
            }) => *n,
            _ => continue,
        };
        if exact {
            if (value - key).abs() < EQ_TOLERANCE {
                return Some(row);
            }
        } else if value <= key && best.is_none_or(|(_, b)| value > b) {
            best = Some((row, value));
        }
    }
    if exact {
        None
    } else {
        best.map(|(row, _)| row)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;
    use crate::formula::parse_expression;
    use crate::grid::Grid;

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

    fn column_grid(values: &[f64]) -> Grid {
        let mut grid = Grid::new(100, 10);
        for (i, &v) in values.iter().enumerate() {
            grid.set_number(i, 0, v);
        }
        grid
    }

    #[test]
    fn sum_skips_text_and_counts_empty_as_zero() {
        let mut grid = column_grid(&[1.0, 2.0, 3.0]);
        grid.set_text(3, 0, "not a number");
        assert_eq!(num(&grid, "=SUM(A1:A6)"), 6.0);
    }

    #[test]
    fn sum_accepts_scalars_and_multiple_ranges() {
        let grid = column_grid(&[1.0, 2.0]);
        assert_eq!(num(&grid, "=SUM(5)"), 5.0);
        assert_eq!(num(&grid, "=SUM(A1:A2, 10)"), 13.0);
    }

    #[test]
    fn avg_counts_empty_cells() {
        let grid = column_grid(&[3.0, 5.0]);
        assert_eq!(num(&grid, "=AVG(A1:A2)"), 4.0);
        // Two values plus two empty slots.
        assert_eq!(num(&grid, "=AVG(A1:A4)"), 2.0);
    }

    #[test]
    fn max_min_handle_negatives() {
        let grid = column_grid(&[-5.0, -2.0, -9.0]);
        assert_eq!(num(&grid, "=MAX(A1:A3)"), -2.0);
        assert_eq!(num(&grid, "=MIN(A1:A3)"), -9.0);
    }

    #[test]
    fn median_odd_and_even() {
        let grid = column_grid(&[9.0, 1.0, 5.0]);
        assert_eq!(num(&grid, "=MEDIAN(A1:A3)"), 5.0);
        let grid = column_grid(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(num(&grid, "=MEDIAN(A1:A4)"), 2.5);
    }

    #[test]
    fn mode_prefers_first_of_equal_frequency() {
        let grid = column_grid(&[7.0, 3.0, 3.0, 7.0, 1.0]);
        assert_eq!(num(&grid, "=MODE(A1:A5)"), 7.0);
        let distinct = column_grid(&[4.0, 5.0, 6.0]);
        assert_eq!(num(&distinct, "=MODE(A1:A3)"), 4.0);
    }

    #[test]
    fn power_follows_library_pow() {
        let grid = Grid::new(10, 10);
        assert_eq!(num(&grid, "=POWER(2,10)"), 1024.0);
        assert_eq!(num(&grid, "=POWER(0,0)"), 1.0);
    }

    #[test]
    fn if_picks_branch_and_carries_strings() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 10.0);
        assert_eq!(
            eval_src(&grid, "=IF(A1>5,\"High\",\"Low\")").unwrap(),
            Value::Text("High".to_string())
        );
        grid.set_number(0, 0, 3.0);
        assert_eq!(
            eval_src(&grid, "=IF(A1>5,\"High\",\"Low\")").unwrap(),
            Value::Text("Low".to_string())
        );
        assert_eq!(num(&grid, "=IF(1,2+3,4)"), 5.0);
    }

    #[test]
    fn if_evaluates_only_the_taken_branch() {
        let grid = Grid::new(10, 10);
        // The untaken branch divides by zero; the formula still succeeds.
        assert_eq!(num(&grid, "=IF(1,42,1/0)"), 42.0);
    }

    fn lookup_grid() -> Grid {
        let mut grid = Grid::new(100, 10);
        for (i, (name, price)) in [("Apple", 0.5), ("Orange", 0.75), ("Banana", 0.3)]
            .iter()
            .enumerate()
        {
            grid.set_text(i, 0, name);
            grid.set_number(i, 1, *price);
        }
        grid
    }

    #[test]
    fn vlookup_string_key_matches_text_cells() {
        let grid = lookup_grid();
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(\"Orange\",A1:B3,2,1)").unwrap(),
            Value::Number(0.75)
        );
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(\"Grape\",A1:B3,2,1)"),
            Err(FormulaError::Na)
        );
    }

    #[test]
    fn vlookup_numeric_exact_and_approximate() {
        let grid = column_grid(&[10.0, 20.0, 30.0]);
        assert_eq!(num(&grid, "=VLOOKUP(20,A1:A3,1,1)"), 20.0);
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(25,A1:A3,1,1)"),
            Err(FormulaError::Na)
        );
        // Approximate: largest value <= key; the fourth argument defaults
        // to approximate.
        assert_eq!(num(&grid, "=VLOOKUP(25,A1:A3,1,0)"), 20.0);
        assert_eq!(num(&grid, "=VLOOKUP(25,A1:A3,1)"), 20.0);
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(5,A1:A3,1,0)"),
            Err(FormulaError::Na)
        );
    }

    #[test]
    fn vlookup_column_out_of_range_is_ref() {
        let grid = lookup_grid();
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(\"Apple\",A1:B3,3,1)"),
            Err(FormulaError::Ref)
        );
        assert_eq!(
            eval_src(&grid, "=VLOOKUP(\"Apple\",A1:B3,0,1)"),
            Err(FormulaError::Ref)
        );
    }

    #[test]
    fn unknown_function_is_parse_error() {
        let grid = Grid::new(10, 10);
        assert_eq!(eval_src(&grid, "=NOPE(1)"), Err(FormulaError::Parse));
    }
}
