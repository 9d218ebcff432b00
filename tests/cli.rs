//! Integration tests for the tabula binary (-c one-shot mode and the stdin
//! command session).

use std::io::Write;
use std::process::{Command, Stdio};

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn run_session(input: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn tabula");

    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for tabula");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_parentheses_and_precedence() {
    let (stdout, _, code) = run_command(&["-c", "=2*(3+4)"]);
    assert_eq!(stdout.trim(), "14");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run_command(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run_command(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "#DIV/0!");
    assert_eq!(code, 1);
}

#[test]
fn test_syntax_error_exit_code() {
    let (_, stderr, code) = run_command(&["-c", "1+"]);
    assert!(stderr.contains("formula syntax"));
    assert_eq!(code, 1);
}

#[test]
fn test_session_formula_and_edit() {
    let input = "\
set A1 2
set A2 =A1+3
values
set A1 4
values
";
    let (stdout, _, code) = run_session(input);
    assert_eq!(stdout, "2\n5\n4\n7\n");
    assert_eq!(code, 0);
}

#[test]
fn test_session_texts_and_escape() {
    let input = "\
set A1 '=1+1
set B1 = 1 + (2*3)
texts
values
";
    let (stdout, _, code) = run_session(input);
    assert_eq!(stdout, "'=1+1\t=1+2*3\n=1+1\t7\n");
    assert_eq!(code, 0);
}

#[test]
fn test_session_circular_dependency() {
    let input = "\
set A1 =A2
set A2 =A1
size
";
    let (stdout, stderr, code) = run_session(input);
    assert!(stderr.contains("circular reference"));
    // A2 exists as the placeholder the first edit materialized.
    assert_eq!(stdout, "2 1\n");
    assert_eq!(code, 0);
}

#[test]
fn test_session_clear_and_count() {
    let input = "\
set B2 =Z9
count
clear B2
count
size
";
    let (stdout, _, code) = run_session(input);
    // Z9 stays as an empty placeholder after B2 is cleared.
    assert_eq!(stdout, "2\n1\n9 26\n");
    assert_eq!(code, 0);
}

#[test]
fn test_session_reports_bad_lines_and_continues() {
    let input = "\
set !! 1
nonsense
set A1 7
values
";
    let (stdout, stderr, code) = run_session(input);
    assert!(stderr.contains("line 1"));
    assert!(stderr.contains("unknown command"));
    assert_eq!(stdout, "7\n");
    assert_eq!(code, 0);
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let input = "\
# build a tiny sheet

set A1 1
set B1 =A1*10
values
";
    let (stdout, _, code) = run_session(input);
    assert_eq!(stdout, "1\t10\n");
    assert_eq!(code, 0);
}
