//! Error types for sheet edits and lookups.

use tabula_formula::{ParseError, Position};
use thiserror::Error;

/// Errors that can fail a sheet operation. Formula *evaluation* problems are
/// not errors; they surface as `CellValue::Error` values.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid position {0:?}")]
    InvalidPosition(Position),

    #[error("formula syntax: {0}")]
    FormulaSyntax(#[from] ParseError),

    #[error("circular reference from {from} to {to}")]
    CircularDependency { from: Position, to: Position },
}

pub type Result<T> = std::result::Result<T, EngineError>;
