//! tabula-formula - formula parsing and evaluation.
//!
//! A formula is an arithmetic expression over numbers and cell references
//! (`1+2*A1`, `-(B2-3)/C4`). Parsing produces a [`Formula`] that can be
//! evaluated against any [`SheetView`], printed back in normalized form, and
//! asked for the cells it references.

mod ast;
mod error;
mod lexer;
mod parser;
mod position;
mod value;

pub use error::ParseError;
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{CellValue, FormulaError, FormulaValue, SheetView, format_number};

use ast::Expr;

/// A parsed formula expression (without the leading `=`).
#[derive(Clone, Debug)]
pub struct Formula {
    ast: Expr,
    references: Vec<Position>,
}

impl Formula {
    /// Parse an expression. The text must be the bare expression, with any
    /// formula marker already stripped.
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        let ast = parser::parse(expression)?;
        let mut references = Vec::new();
        ast.collect_references(&mut references);
        references.sort_unstable();
        references.dedup();
        Ok(Formula { ast, references })
    }

    /// Evaluate against `sheet`. Failures come back as [`FormulaError`]
    /// values, never panics.
    pub fn evaluate(&self, sheet: &dyn SheetView) -> FormulaValue {
        self.ast.evaluate(sheet)
    }

    /// The normalized expression text: canonical references, minimal
    /// parentheses, no leading `=`.
    pub fn expression(&self) -> String {
        let mut out = String::new();
        self.ast.write_normalized(&mut out);
        out
    }

    /// In-range cells the formula mentions, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }
}
