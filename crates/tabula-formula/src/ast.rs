//! Formula syntax tree: evaluation, reference collection, and normalized
//! printing with minimal parentheses.

use crate::position::Position;
use crate::value::{CellValue, FormulaError, FormulaValue, SheetView, format_number};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Reference(Position),
    /// A reference naming a cell outside the addressable sheet. Printed as
    /// written; evaluates to `#REF!`.
    InvalidReference(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Reference(_) | Expr::InvalidReference(_) => ATOM_PRECEDENCE,
            Expr::Unary(..) => UNARY_PRECEDENCE,
            Expr::Binary(op, ..) => op.precedence(),
        }
    }

    pub(crate) fn write_normalized(&self, out: &mut String) {
        match self {
            Expr::Number(n) => out.push_str(&format_number(*n)),
            Expr::Reference(pos) => out.push_str(&pos.to_string()),
            Expr::InvalidReference(text) => out.push_str(text),
            Expr::Unary(op, inner) => {
                out.push(match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                });
                write_child(inner, inner.precedence() < UNARY_PRECEDENCE, out);
            }
            Expr::Binary(op, lhs, rhs) => {
                write_child(lhs, lhs.precedence() < op.precedence(), out);
                out.push(op.symbol());
                // Subtraction and division are left-associative only, so an
                // equal-precedence right operand keeps its parentheses.
                let wrap_rhs = rhs.precedence() < op.precedence()
                    || (rhs.precedence() == op.precedence()
                        && matches!(op, BinaryOp::Sub | BinaryOp::Div));
                write_child(rhs, wrap_rhs, out);
            }
        }
    }

    pub(crate) fn evaluate(&self, sheet: &dyn SheetView) -> FormulaValue {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Reference(pos) => value_as_number(sheet.value_at(*pos)),
            Expr::InvalidReference(_) => Err(FormulaError::Ref),
            Expr::Unary(op, inner) => {
                let value = inner.evaluate(sheet)?;
                Ok(match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Minus => -value,
                })
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.evaluate(sheet)?;
                let r = rhs.evaluate(sheet)?;
                let result = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => {
                        if r == 0.0 {
                            return Err(FormulaError::Div0);
                        }
                        l / r
                    }
                };
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::Div0)
                }
            }
        }
    }

    pub(crate) fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Reference(pos) => out.push(*pos),
            Expr::Unary(_, inner) => inner.collect_references(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
            Expr::Number(_) | Expr::InvalidReference(_) => {}
        }
    }
}

fn write_child(child: &Expr, wrap: bool, out: &mut String) {
    if wrap {
        out.push('(');
        child.write_normalized(out);
        out.push(')');
    } else {
        child.write_normalized(out);
    }
}

/// Coerce a referenced cell's value to a number: absent and empty cells read
/// as zero, numeric text reads as its number, anything else is `#VALUE!`,
/// and error values propagate.
fn value_as_number(value: Option<CellValue>) -> FormulaValue {
    let Some(value) = value else {
        return Ok(0.0);
    };
    match value {
        CellValue::Number(n) => Ok(n),
        CellValue::Text(s) => {
            if s.is_empty() {
                Ok(0.0)
            } else {
                s.parse::<f64>().map_err(|_| FormulaError::Value)
            }
        }
        CellValue::Error(e) => Err(e),
    }
}
