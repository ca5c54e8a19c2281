//! Structured error types for termsheet.
//!
//! Host-level failures only: I/O, CSV, malformed API input. Formula
//! evaluation errors are per-cell data (see [`crate::formula::FormulaError`])
//! and never surface through this type.

/// All errors that can occur in termsheet outside of formula evaluation.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// CSV reading/writing error from the csv crate.
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// General parse error (commands, colors, labels).
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetError>;

impl From<String> for SheetError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SheetError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
