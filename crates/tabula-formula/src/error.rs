//! Parse-time errors.

use thiserror::Error;

/// The expression text could not be parsed as a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("malformed number literal {0:?}")]
    MalformedNumber(String),

    #[error("column letters {0:?} are not followed by a row number")]
    MalformedReference(String),

    #[error("unexpected {0} in formula")]
    UnexpectedToken(&'static str),

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("formula is empty")]
    Empty,
}
