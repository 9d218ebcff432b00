//! Cell values and evaluation errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::position::{Position, Size};

/// Evaluation-time failure, surfaced as a first-class cell value rather than
/// a fallible result.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FormulaError {
    #[error("#REF!")]
    Ref,
    #[error("#VALUE!")]
    Value,
    #[error("#DIV/0!")]
    Div0,
}

/// The outcome of evaluating a formula: a number, or an error value.
pub type FormulaValue = Result<f64, FormulaError>;

/// What a cell presents to readers: literal text, a number, or a formula
/// evaluation error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Format a number for display and for normalized expression text.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Read access the evaluator needs into the enclosing sheet.
pub trait SheetView {
    /// Value of the cell at `pos`, or None when no cell is stored there.
    fn value_at(&self, pos: Position) -> Option<CellValue>;

    /// Bounding box of the stored cells.
    fn printable_size(&self) -> Size;
}
