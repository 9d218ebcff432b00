//! Line-oriented commands for the interactive harness.
//!
//! One command per line; blank lines and `#` comments are skipped.

use tabula_engine::Position;

use crate::error::{Result, TabulaError};

/// A single harness command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `set CELL TEXT`: store text (or an `=` formula) at a cell.
    Set { pos: Position, text: String },
    /// `clear CELL`: remove a cell.
    Clear { pos: Position },
    /// `values`: print the evaluated sheet.
    Values,
    /// `texts`: print the cell texts.
    Texts,
    /// `size`: print the printable bounding box as `rows cols`.
    Size,
    /// `count`: print the number of stored cells.
    Count,
}

/// Parse one input line; comments and blank lines come back as None.
pub fn parse_command(line: &str, line_num: usize) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim_start()),
        None => (line, ""),
    };

    let command = match keyword {
        "set" => {
            let (cell, text) = match rest.split_once(char::is_whitespace) {
                Some((cell, text)) => (cell, text),
                None => (rest, ""),
            };
            Command::Set {
                pos: parse_position(cell, line_num)?,
                text: text.to_string(),
            }
        }
        "clear" => Command::Clear {
            pos: parse_position(rest, line_num)?,
        },
        "values" => no_argument(Command::Values, rest, line_num)?,
        "texts" => no_argument(Command::Texts, rest, line_num)?,
        "size" => no_argument(Command::Size, rest, line_num)?,
        "count" => no_argument(Command::Count, rest, line_num)?,
        other => {
            return Err(TabulaError::Parse {
                line: line_num,
                message: format!("unknown command: {}", other),
            });
        }
    };
    Ok(Some(command))
}

fn no_argument(command: Command, rest: &str, line_num: usize) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(TabulaError::Parse {
            line: line_num,
            message: format!("unexpected argument: {}", rest),
        })
    }
}

fn parse_position(name: &str, line_num: usize) -> Result<Position> {
    Position::from_a1(name)
        .filter(Position::is_valid)
        .ok_or_else(|| TabulaError::Parse {
            line: line_num,
            message: format!("invalid cell name: {}", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_with_text() {
        let command = parse_command("set A1 =B2+1", 1).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Set {
                pos: Position::new(0, 0),
                text: "=B2+1".to_string(),
            }
        );
    }

    #[test]
    fn set_without_text_stores_empty() {
        let command = parse_command("set B2", 1).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Set {
                pos: Position::new(1, 1),
                text: String::new(),
            }
        );
    }

    #[test]
    fn set_keeps_inner_spaces() {
        let command = parse_command("set A1 hello world", 1).unwrap().unwrap();
        match command {
            Command::Set { text, .. } => assert_eq!(text, "hello world"),
            other => panic!("expected set, got {:?}", other),
        }
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("values", 1).unwrap(), Some(Command::Values));
        assert_eq!(parse_command("texts", 2).unwrap(), Some(Command::Texts));
        assert_eq!(parse_command("size", 3).unwrap(), Some(Command::Size));
        assert_eq!(parse_command("count", 4).unwrap(), Some(Command::Count));
        assert_eq!(
            parse_command("clear Z9", 5).unwrap(),
            Some(Command::Clear {
                pos: Position::new(8, 25)
            })
        );
    }

    #[test]
    fn skips_blanks_and_comments() {
        assert_eq!(parse_command("", 1).unwrap(), None);
        assert_eq!(parse_command("   ", 2).unwrap(), None);
        assert_eq!(parse_command("# a comment", 3).unwrap(), None);
    }

    #[test]
    fn reports_bad_input_with_line_numbers() {
        let err = parse_command("nope", 7).unwrap_err();
        assert!(matches!(err, TabulaError::Parse { line: 7, .. }));

        let err = parse_command("set 12 x", 9).unwrap_err();
        assert!(matches!(err, TabulaError::Parse { line: 9, .. }));

        let err = parse_command("values now", 4).unwrap_err();
        assert!(matches!(err, TabulaError::Parse { line: 4, .. }));
    }
}
