//! Tabula - a dependency-aware spreadsheet engine with a CLI harness.

mod commands;
mod error;

use std::env;
use std::io::{self, BufRead, Write};

use tabula_engine::{CellValue, Position, Sheet};

use commands::Command;

/// Evaluate a single formula in a scratch sheet and print its value.
/// Returns false when the result is a formula error.
fn run_command_mode(formula: &str) -> error::Result<bool> {
    let formula = formula.trim();

    // Prepend '=' if not present, so `-c "1+2"` works as expected.
    let input = if formula.starts_with('=') {
        formula.to_string()
    } else {
        format!("={}", formula)
    };

    let mut sheet = Sheet::new();
    let pos = Position::new(0, 0);
    sheet.set_cell(pos, &input)?;

    let value = sheet.cell_value(pos)?;
    println!("{}", value);
    Ok(!matches!(value, CellValue::Error(_)))
}

/// Drive a sheet from line commands on `input`, writing results to `output`.
/// Bad lines are reported on stderr and do not end the session.
fn run_session<R: BufRead, W: Write>(input: R, output: &mut W) -> error::Result<()> {
    let mut sheet = Sheet::new();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_num = index + 1;

        let command = match commands::parse_command(&line, line_num) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };

        let outcome = match command {
            Command::Set { pos, text } => sheet.set_cell(pos, &text),
            Command::Clear { pos } => sheet.clear_cell(pos),
            Command::Values => {
                sheet.print_values(output)?;
                Ok(())
            }
            Command::Texts => {
                sheet.print_texts(output)?;
                Ok(())
            }
            Command::Size => {
                let size = sheet.printable_size();
                writeln!(output, "{} {}", size.rows, size.cols)?;
                Ok(())
            }
            Command::Count => {
                writeln!(output, "{}", sheet.cell_count())?;
                Ok(())
            }
        };

        if let Err(err) = outcome {
            eprintln!("line {}: {}", line_num, err);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: tabula [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command FORMULA   Evaluate FORMULA and exit");
    eprintln!("  -h, --help              Show this help");
    eprintln!();
    eprintln!("Without options, tabula reads commands from stdin:");
    eprintln!("  set CELL TEXT    store text or =FORMULA at CELL");
    eprintln!("  clear CELL       remove CELL");
    eprintln!("  values           print the evaluated sheet");
    eprintln!("  texts            print the cell texts");
    eprintln!("  size             print the printable size");
    eprintln!("  count            print the stored cell count");
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut command_formula: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--command" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires an argument", args[i]);
                    print_usage();
                    std::process::exit(2);
                }
                command_formula = Some(args[i + 1].clone());
                i += 2;
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Error: unknown argument: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
    }

    let result = match command_formula {
        Some(formula) => run_command_mode(&formula).map(|ok| {
            if !ok {
                std::process::exit(1);
            }
        }),
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_session(stdin.lock(), &mut stdout)
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
