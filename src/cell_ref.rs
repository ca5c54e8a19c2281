//! Parsing and printing of A1-style cell references and ranges.

use crate::formula::FormulaError;
use crate::types::CellRange;

/// Render `(row, col)` as an A1-style label: letter-block column, one-based
/// row, no padding. `(0, 0)` → `"A1"`, column 26 → `"AA"`.
#[allow(clippy::cast_possible_truncation)] // rem < 26
pub fn index_to_label(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut c = col + 1;
    while c > 0 {
        let rem = (c - 1) % 26;
        letters.push(b'A' + rem as u8);
        c = (c - 1) / 26;
    }
    letters.reverse();
    let mut label = String::with_capacity(letters.len() + 4);
    for b in letters {
        label.push(char::from(b));
    }
    label.push_str(&(row + 1).to_string());
    label
}

/// Parse a cell label like "A1" into 0-indexed `(row, col)`.
///
/// Accepts surrounding whitespace. Requires at least one ASCII letter
/// followed by at least one ASCII digit; anything else (including trailing
/// junk) is a parse error.
pub fn parse_label(label: &str) -> Result<(usize, usize), FormulaError> {
    let s = label.trim();

    let mut col: usize = 0;
    let mut saw_col = false;
    let mut row: usize = 0;
    let mut saw_row = false;

    let mut rest = s;
    for (idx, ch) in s.char_indices() {
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add(upper as usize - 'A' as usize + 1))
                .ok_or(FormulaError::Parse)?;
            saw_col = true;
            rest = &s[idx + ch.len_utf8()..];
        } else {
            break;
        }
    }

    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            row = row
                .checked_mul(10)
                .and_then(|r| r.checked_add(ch as usize - '0' as usize))
                .ok_or(FormulaError::Parse)?;
            saw_row = true;
        } else {
            return Err(FormulaError::Parse);
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return Err(FormulaError::Parse);
    }

    Ok((row - 1, col - 1))
}

/// Parse a range like "A1:B5" into a canonical [`CellRange`].
///
/// Exactly one `:` separates the two labels; the result is canonicalized
/// so inverted inputs ("B5:A1") come out ordered.
pub fn parse_range(range: &str) -> Result<CellRange, FormulaError> {
    let (start, end) = range.split_once(':').ok_or(FormulaError::Parse)?;
    if end.contains(':') {
        return Err(FormulaError::Parse);
    }
    let (start_row, start_col) = parse_label(start)?;
    let (end_row, end_col) = parse_label(end)?;
    Ok(CellRange::new(start_row, start_col, end_row, end_col))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use test_case::test_case;

    #[test_case(0, 0, "A1")]
    #[test_case(26, 0, "A27")]
    #[test_case(0, 25, "Z1")]
    #[test_case(0, 26, "AA1")]
    #[test_case(0, 51, "AZ1")]
    #[test_case(0, 52, "BA1")]
    #[test_case(99, 99, "CV100")]
    fn labels_render(row: usize, col: usize, expected: &str) {
        assert_eq!(index_to_label(row, col), expected);
    }

    #[test]
    fn label_roundtrip() {
        for row in [0, 1, 25, 99, 999] {
            for col in [0, 1, 25, 26, 51, 99] {
                let label = index_to_label(row, col);
                assert_eq!(parse_label(&label).unwrap(), (row, col), "{label}");
            }
        }
    }

    #[test]
    fn label_accepts_whitespace_and_lowercase() {
        assert_eq!(parse_label("  b27  ").unwrap(), (26, 1));
    }

    #[test_case(""; "empty")]
    #[test_case("A"; "no digits")]
    #[test_case("12"; "no letters")]
    #[test_case("A1x"; "trailing junk")]
    #[test_case("A 1"; "interior space")]
    #[test_case("A0"; "row zero")]
    #[test_case("1A"; "digits first")]
    fn label_rejects(input: &str) {
        assert!(parse_label(input).is_err());
    }

    #[test]
    fn range_canonicalizes() {
        let range = parse_range("B5:A1").unwrap();
        assert_eq!(
            (range.start_row, range.start_col, range.end_row, range.end_col),
            (0, 0, 4, 1)
        );
    }

    #[test]
    fn range_rejects_malformed() {
        assert!(parse_range("A1").is_err());
        assert!(parse_range("A1:B2:C3").is_err());
        assert!(parse_range("A1:").is_err());
    }
}
