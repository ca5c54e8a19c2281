//! Recursive-descent formula parser.
//!
//! Grammar (comparison sits on top and appears at most once):
//!
//! ```text
//! formula    := '=' comparison
//! comparison := arithmetic ( ('='|'<>'|'<'|'<='|'>'|'>=') arithmetic )?
//! arithmetic := term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := '(' arithmetic ')' | function | cell_ref | range
//!             | number | string_literal
//! function   := IDENT '(' arg (',' arg)* ')'
//! ```
//!
//! Factor disambiguation consumes the maximal run of alphanumerics and
//! `:` and classifies it: a run with `:` is a range, a fully alphabetic
//! run followed by `(` is a function call, a letters-then-digits run is a
//! cell reference, anything else falls back to numeric parsing from the
//! factor's start.

use super::{BinOp, CmpOp, Expr, FormulaError};
use crate::cell_ref;

/// Parse a formula expression. An optional leading `=` is stripped; the
/// whole input must be consumed.
pub fn parse_expression(source: &str) -> Result<Expr, FormulaError> {
    let src = source.strip_prefix('=').unwrap_or(source);
    let mut parser = Parser { src, pos: 0 };
    let expr = parser.parse_comparison()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(FormulaError::Parse);
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, FormulaError> {
        let left = self.parse_arithmetic()?;
        self.skip_ws();
        let Some(op) = self.comparison_op() else {
            return Ok(left);
        };
        let right = self.parse_arithmetic()?;
        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn comparison_op(&mut self) -> Option<CmpOp> {
        match self.peek()? {
            '=' => {
                self.bump();
                Some(CmpOp::Eq)
            }
            '<' => {
                self.bump();
                if self.eat('>') {
                    Some(CmpOp::Ne)
                } else if self.eat('=') {
                    Some(CmpOp::Le)
                } else {
                    Some(CmpOp::Lt)
                }
            }
            '>' => {
                self.bump();
                if self.eat('=') {
                    Some(CmpOp::Ge)
                } else {
                    Some(CmpOp::Gt)
                }
            }
            _ => None,
        }
    }

    fn parse_arithmetic(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.parse_term()?;
        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some('+') => BinOp::Add,
                Some('-') => BinOp::Sub,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.parse_factor()?;
        loop {
            self.skip_ws();
            let op = match self.peek() {
                Some('*') => BinOp::Mul,
                Some('/') => BinOp::Div,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_factor(&mut self) -> Result<Expr, FormulaError> {
        self.skip_ws();

        match self.peek() {
            None => return Err(FormulaError::Parse),
            Some('(') => {
                self.bump();
                let inner = self.parse_arithmetic()?;
                self.skip_ws();
                if !self.eat(')') {
                    return Err(FormulaError::Parse);
                }
                return Ok(inner);
            }
            Some('"') => return self.parse_string_literal(),
            _ => {}
        }

        let start = self.pos;
        let word: &str = {
            let rest = self.rest();
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == ':'))
                .unwrap_or(rest.len());
            rest.get(..end).unwrap_or("")
        };

        if word.is_empty() {
            return self.parse_number();
        }

        if word.contains(':') {
            let range = cell_ref::parse_range(word).map_err(|_| FormulaError::Ref)?;
            self.pos = start + word.len();
            return Ok(Expr::Range(range));
        }

        if word.chars().all(|c| c.is_ascii_alphabetic()) {
            // A bare identifier is a function name when `(` follows
            // (whitespace allowed between).
            let after = start + word.len();
            let mut probe = Parser {
                src: self.src,
                pos: after,
            };
            probe.skip_ws();
            if probe.peek() == Some('(') {
                self.pos = probe.pos + 1;
                return self.parse_call(word);
            }
            return Err(FormulaError::Parse);
        }

        if let Ok((row, col)) = cell_ref::parse_label(word) {
            self.pos = start + word.len();
            return Ok(Expr::Ref { row, col });
        }

        self.parse_number()
    }

    fn parse_string_literal(&mut self) -> Result<Expr, FormulaError> {
        // Opening quote already peeked.
        self.bump();
        let rest = self.rest();
        let Some(close) = rest.find('"') else {
            return Err(FormulaError::Parse);
        };
        let literal = rest.get(..close).unwrap_or("").to_string();
        self.pos += close + 1;
        Ok(Expr::Str(literal))
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, FormulaError> {
        // `(` already consumed.
        let mut args = Vec::new();
        loop {
            args.push(self.parse_argument()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                break;
            }
            return Err(FormulaError::Parse);
        }
        Ok(Expr::Call {
            name: name.to_ascii_uppercase(),
            args,
        })
    }

    fn parse_argument(&mut self) -> Result<Expr, FormulaError> {
        self.skip_ws();
        if self.peek() == Some('"') {
            return self.parse_string_literal();
        }
        // Arguments admit a comparison so conditions like `IF(A1>5, ...)`
        // parse.
        self.parse_comparison()
    }

    /// strtod-style numeric scan from the current position: optional sign,
    /// digits with optional fraction, optional exponent.
    fn parse_number(&mut self) -> Result<Expr, FormulaError> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = 0;

        if matches!(bytes.first(), Some(b'+' | b'-')) {
            len += 1;
        }
        let mantissa_start = len;
        while bytes.get(len).is_some_and(u8::is_ascii_digit) {
            len += 1;
        }
        if bytes.get(len) == Some(&b'.') {
            len += 1;
            while bytes.get(len).is_some_and(u8::is_ascii_digit) {
                len += 1;
            }
        }
        if len == mantissa_start || !bytes.get(mantissa_start).is_some_and(|b| b.is_ascii_digit() || *b == b'.') {
            return Err(FormulaError::Parse);
        }
        if matches!(bytes.get(len), Some(b'e' | b'E')) {
            let mut exp_len = len + 1;
            if matches!(bytes.get(exp_len), Some(b'+' | b'-')) {
                exp_len += 1;
            }
            if bytes.get(exp_len).is_some_and(u8::is_ascii_digit) {
                while bytes.get(exp_len).is_some_and(u8::is_ascii_digit) {
                    exp_len += 1;
                }
                len = exp_len;
            }
        }

        let text = rest.get(..len).ok_or(FormulaError::Parse)?;
        let value: f64 = text.parse().map_err(|_| FormulaError::Parse)?;
        self.pos += len;
        Ok(Expr::Number(value))
    }
}
