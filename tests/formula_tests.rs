//! Formula behavior through the engine facade.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{empty_sheet, fill_column, fill_column_text};

// ============================================================================
// Aggregates
// ============================================================================

#[test]
fn sum_matches_pairwise_addition_with_text_skipped() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[1.5, 2.5, 3.0]);
    sheet.set_text(3, 0, "header");
    // A5 left empty; empties count as zero.
    sheet.set_formula(0, 1, "=SUM(A1:A5)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "7");
}

#[test]
fn median_and_mode_ignore_input_order() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[5.0, 1.0, 9.0, 1.0]);
    fill_column(&mut sheet, 1, &[1.0, 1.0, 5.0, 9.0]);
    sheet.set_formula(0, 2, "=MEDIAN(A1:A4)");
    sheet.set_formula(1, 2, "=MEDIAN(B1:B4)");
    sheet.set_formula(2, 2, "=MODE(A1:A4)");
    sheet.set_formula(3, 2, "=MODE(B1:B4)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 2), sheet.display_value(1, 2));
    assert_eq!(sheet.display_value(0, 2), "3");
    assert_eq!(sheet.display_value(2, 2), "1");
    assert_eq!(sheet.display_value(3, 2), "1");
}

#[test]
fn aggregate_skips_errored_formula_cells() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[1.0, 2.0]);
    sheet.set_formula(2, 0, "=1/0");
    sheet.set_formula(0, 1, "=SUM(A1:A3)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(2, 0), "#DIV/0!");
    assert_eq!(sheet.display_value(0, 1), "3");
}

#[test]
fn multi_range_sum() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[1.0, 2.0]);
    fill_column(&mut sheet, 2, &[10.0, 20.0]);
    sheet.set_formula(0, 4, "=SUM(A1:A2, C1:C2)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 4), "33");
}

// ============================================================================
// String results
// ============================================================================

#[test]
fn string_if_result_is_byte_identical_after_recalc() {
    let mut sheet = empty_sheet();
    sheet.set_number(0, 0, 1.0);
    sheet.set_formula(0, 1, "=IF(A1,\"Exact Bytes  Here\",\"no\")");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "Exact Bytes  Here");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "Exact Bytes  Here");
}

#[test]
fn formula_string_results_participate_in_comparisons() {
    let mut sheet = empty_sheet();
    sheet.set_number(0, 0, 10.0);
    sheet.set_formula(0, 1, "=IF(A1>5,\"High\",\"Low\")");
    sheet.set_formula(0, 2, "=B1=\"High\"");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 2), "1");
}

#[test]
fn vlookup_matches_formula_string_results() {
    let mut sheet = empty_sheet();
    sheet.set_formula(0, 0, "=IF(1,\"Key\",\"other\")");
    sheet.set_number(0, 1, 7.0);
    sheet.set_formula(2, 2, "=VLOOKUP(\"Key\",A1:B1,2,1)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(2, 2), "7");
}

// ============================================================================
// Boundary behavior
// ============================================================================

#[test]
fn power_zero_zero_is_one() {
    let mut sheet = empty_sheet();
    sheet.set_formula(0, 0, "=POWER(0,0)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 0), "1");
}

#[test]
fn tiny_denominator_is_not_division_by_zero() {
    let mut sheet = empty_sheet();
    sheet.set_formula(0, 0, "=1/1e-300");
    sheet.recalculate();
    let shown = sheet.display_value(0, 0);
    assert!(!shown.starts_with('#'), "unexpected error token: {shown}");
}

#[test]
fn exact_zero_denominator_is_division_by_zero() {
    let mut sheet = empty_sheet();
    sheet.set_formula(0, 0, "=5/(2-2)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 0), "#DIV/0!");
}

#[test]
fn text_where_number_needed_is_value_error() {
    let mut sheet = empty_sheet();
    sheet.set_text(0, 0, "word");
    sheet.set_formula(0, 1, "=A1*2");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "#VALUE!");
}

#[test]
fn malformed_formula_renders_parse_token() {
    let mut sheet = empty_sheet();
    sheet.set_formula(0, 0, "=SUM(A1:A2");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 0), "#PARSE!");
}

#[test]
fn bare_range_factor_sums() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[2.0, 3.0]);
    sheet.set_formula(0, 1, "=A1:A2*10");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "50");
}

#[test]
fn case_insensitive_function_names() {
    let mut sheet = empty_sheet();
    fill_column(&mut sheet, 0, &[1.0, 2.0]);
    sheet.set_formula(0, 1, "=sUm(A1:A2)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "3");
}

#[test]
fn referenced_text_is_case_sensitive() {
    let mut sheet = empty_sheet();
    fill_column_text(&mut sheet, 0, &["Apple"]);
    sheet.set_formula(0, 1, "=VLOOKUP(\"apple\",A1:A1,1,1)");
    sheet.recalculate();
    assert_eq!(sheet.display_value(0, 1), "#N/A!");
}
