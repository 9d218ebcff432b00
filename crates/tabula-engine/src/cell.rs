//! Cell content and the formula result cache.

use std::cell::RefCell;

use tabula_formula::{CellValue, Formula, FormulaValue, Position, SheetView};

use crate::error::Result;

/// First character marking formula input.
pub const FORMULA_SIGN: char = '=';
/// Leading character that keeps otherwise-special text literal.
pub const ESCAPE_SIGN: char = '\'';

#[derive(Clone, Debug, Default)]
enum Content {
    #[default]
    Empty,
    Text(String),
    Formula(Formula),
}

/// A cell: empty, literal text, or a parsed formula.
///
/// Formula results are memoized. The cache is interior-mutable state, not
/// content: reading a value and dropping the cache both work through `&self`,
/// and neither counts as editing the cell.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    content: Content,
    cache: RefCell<Option<FormulaValue>>,
}

impl Cell {
    /// A fresh empty cell.
    pub fn new() -> Cell {
        Cell::default()
    }

    /// Build a cell from user input.
    ///
    /// Empty input makes an empty cell; input longer than one character
    /// starting with `=` is parsed as a formula; anything else is stored as
    /// literal text.
    pub fn from_input(input: &str) -> Result<Cell> {
        let content = if input.is_empty() {
            Content::Empty
        } else if input.len() > 1 && input.starts_with(FORMULA_SIGN) {
            Content::Formula(Formula::parse(&input[1..])?)
        } else {
            Content::Text(input.to_string())
        };
        Ok(Cell {
            content,
            cache: RefCell::new(None),
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, Content::Empty)
    }

    /// The text projection: what the user would see when editing. Formulas
    /// come back normalized, with the leading `=` restored.
    pub fn text(&self) -> String {
        match &self.content {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// The value projection. A leading escape mark is stripped from text;
    /// formulas are evaluated against `sheet` on first read and served from
    /// the cache afterwards.
    pub fn value(&self, sheet: &dyn SheetView) -> CellValue {
        match &self.content {
            Content::Empty => CellValue::Text(String::new()),
            Content::Text(text) => {
                let shown = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text);
                CellValue::Text(shown.to_string())
            }
            Content::Formula(formula) => {
                // Copy the cache out before evaluating: evaluation re-enters
                // the sheet and must not find this cell's cache borrowed.
                let cached = *self.cache.borrow();
                let result = match cached {
                    Some(result) => result,
                    None => {
                        let result = formula.evaluate(sheet);
                        *self.cache.borrow_mut() = Some(result);
                        result
                    }
                };
                match result {
                    Ok(number) => CellValue::Number(number),
                    Err(error) => CellValue::Error(error),
                }
            }
        }
    }

    /// In-range cells the formula mentions, sorted and deduplicated; empty
    /// for non-formula cells.
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            Content::Formula(formula) => formula.referenced_cells(),
            _ => &[],
        }
    }

    /// Drop the cached formula result.
    pub fn invalidate_cache(&self) {
        self.cache.take();
    }

    /// The memoized formula result, if one is currently held.
    pub fn cached_value(&self) -> Option<FormulaValue> {
        *self.cache.borrow()
    }
}
