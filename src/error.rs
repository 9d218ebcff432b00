//! Error types for the tabula command-line harness.

use thiserror::Error;

/// Errors that can occur in the tabula application
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Engine(#[from] tabula_engine::EngineError),
}

pub type Result<T> = std::result::Result<T, TabulaError>;
