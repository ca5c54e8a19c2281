//! Cell content and cached evaluation state.

use serde::{Deserialize, Serialize};

use crate::formula::FormulaError;

use super::{Align, CellFormat};

/// A computed scalar: the result of evaluating a formula (or a fragment of
/// one). Text results come from string literals flowing through `IF`
/// branches and comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// The numeric view of this value, if it has one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether this is a text result.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Result cache of a formula cell. `None` until the first recalculation.
pub type FormulaCache = Option<std::result::Result<Value, FormulaError>>;

/// What a cell holds. String and formula arms own their heap data; the
/// formula cache is refreshed by recalculation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Formula {
        /// Source expression as typed, including the leading `=`.
        source: String,
        #[serde(skip)]
        cache: FormulaCache,
    },
}

/// Discriminant of [`CellContent`], for status-line decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Number,
    Text,
    Formula,
}

impl CellContent {
    /// Whether the cell displays nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The content's discriminant.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Empty => CellKind::Empty,
            Self::Number(_) => CellKind::Number,
            Self::Text(_) => CellKind::Text,
            Self::Formula { .. } => CellKind::Formula,
        }
    }
}

/// A single cell: typed content plus presentation state and its own
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub content: CellContent,
    pub format: CellFormat,
}

impl Cell {
    /// A default (empty, default-formatted) cell at `(row, col)`.
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            content: CellContent::Empty,
            format: CellFormat::default(),
        }
    }

    /// Replace content with a number, preserving formatting.
    pub fn set_number(&mut self, value: f64) {
        self.content = CellContent::Number(value);
    }

    /// Replace content with text, preserving formatting. Text defaults to
    /// left alignment.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = CellContent::Text(text.into());
        self.format.align = Align::Left;
    }

    /// Replace content with a formula, preserving formatting. The cache
    /// resets to unevaluated; the stored source always carries the
    /// leading `=`.
    pub fn set_formula(&mut self, source: &str) {
        let source = if source.starts_with('=') {
            source.to_string()
        } else {
            format!("={source}")
        };
        self.content = CellContent::Formula {
            source,
            cache: None,
        };
    }

    /// Clear content, preserving formatting.
    pub fn clear_content(&mut self) {
        self.content = CellContent::Empty;
    }

    /// The cached text of this cell if it is a text cell or a formula with
    /// a string result. Used by string comparisons and `VLOOKUP` string
    /// keys.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        match &self.content {
            CellContent::Text(s) => Some(s),
            CellContent::Formula {
                cache: Some(Ok(Value::Text(s))),
                ..
            } => Some(s),
            _ => None,
        }
    }
}
