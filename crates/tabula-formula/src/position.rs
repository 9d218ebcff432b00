//! Cell positions and sheet dimensions.
//!
//! Provides bidirectional conversion between spreadsheet-style cell names
//! (e.g. "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//! Column letters run base-26 (A..Z, AA..AZ, BA..); rows are 1-indexed in
//! text form and 0-indexed in memory.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows in a sheet.
pub const MAX_ROWS: usize = 16_384;
/// Number of addressable columns in a sheet.
pub const MAX_COLS: usize = 16_384;

/// A cell position as row and column indices (0-indexed).
#[derive(
    Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Parse a position from spreadsheet notation (e.g. "A1", "AA10").
    ///
    /// Only the canonical shape `[A-Z]+[0-9]+` is accepted. The returned
    /// position may still lie outside the addressable sheet; check
    /// [`Position::is_valid`] before handing it to storage.
    pub fn from_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Row and column both within the addressable sheet bounds.
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").expect("cell name regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s).ok_or_else(|| format!("Invalid cell name: {}", s))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Printable bounding box of a sheet: every stored cell fits inside
/// `rows x cols` with the top-left corner at A1.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_letter_columns() {
        assert_eq!(Position::from_a1("A1"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_a1("B1"), Some(Position::new(0, 1)));
        assert_eq!(Position::from_a1("Z1"), Some(Position::new(0, 25)));
    }

    #[test]
    fn parse_multi_letter_columns() {
        assert_eq!(Position::from_a1("AA1").unwrap().col, 26);
        assert_eq!(Position::from_a1("AB1").unwrap().col, 27);
        assert_eq!(Position::from_a1("AZ1").unwrap().col, 51);
        assert_eq!(Position::from_a1("BA1").unwrap().col, 52);
    }

    #[test]
    fn parse_row_numbers() {
        assert_eq!(Position::from_a1("A1").unwrap().row, 0);
        assert_eq!(Position::from_a1("A10").unwrap().row, 9);
        assert_eq!(Position::from_a1("A100").unwrap().row, 99);
    }

    #[test]
    fn parse_rejects_malformed_names() {
        assert_eq!(Position::from_a1(""), None);
        assert_eq!(Position::from_a1("123"), None);
        assert_eq!(Position::from_a1("ABC"), None);
        assert_eq!(Position::from_a1("A0"), None);
        assert_eq!(Position::from_a1("1A"), None);
        assert_eq!(Position::from_a1("A 1"), None);
        assert_eq!(Position::from_a1("a1"), None);
        assert_eq!(Position::from_a1("A1B2"), None);
    }

    #[test]
    fn parse_accepts_out_of_range_names() {
        let pos = Position::from_a1("A16385").unwrap();
        assert_eq!(pos.row, 16_384);
        assert!(!pos.is_valid());
    }

    #[test]
    fn display_round_trip() {
        for pos in [
            Position::new(0, 0),
            Position::new(8, 25),
            Position::new(99, 26),
            Position::new(MAX_ROWS - 1, MAX_COLS - 1),
        ] {
            assert_eq!(Position::from_a1(&pos.to_string()), Some(pos));
        }
    }

    #[test]
    fn col_letters() {
        assert_eq!(Position::col_to_letters(0), "A");
        assert_eq!(Position::col_to_letters(25), "Z");
        assert_eq!(Position::col_to_letters(26), "AA");
        assert_eq!(Position::col_to_letters(51), "AZ");
        assert_eq!(Position::col_to_letters(52), "BA");
    }

    #[test]
    fn ordering_is_row_major() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }
}
