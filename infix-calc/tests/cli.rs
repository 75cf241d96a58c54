use std::ffi::OsStr;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn infix_calc<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_infix-calc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run infix-calc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_prints_trace_lines() {
    let output = infix_calc(["(2 + 3) * 4"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "tokens: ( 2 + 3 ) * 4\nrpn: 2 3 + 4 *\nresult: 20\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn test_cli_usage_error() {
    for args in [vec![], vec!["1", "2"], vec!["1 + 1", "extra", "args"]] {
        let output = infix_calc(args);

        assert_eq!(output.status.code(), Some(1));
        assert_eq!(stdout(&output), "");
        assert!(stderr(&output).starts_with("E: usage: "), "{}", stderr(&output));
        assert!(stderr(&output).ends_with(" <expr>\n"), "{}", stderr(&output));
    }
}

#[test]
fn test_cli_tokenizer_error() {
    let output = infix_calc(["1 @ 2"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "E: unknown character `@` at position 2\n");
}

#[test]
fn test_cli_evaluation_error_keeps_earlier_lines() {
    let output = infix_calc(["1 / 0"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "tokens: 1 / 0\nrpn: 1 0 /\n");
    assert_eq!(stderr(&output), "E: division by zero at position 2\n");
}

#[test]
fn test_cli_malformed_expression() {
    let output = infix_calc([")("]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "tokens: ) (\nrpn: (\n");
    assert_eq!(
        stderr(&output),
        "E: malformed expression: unmatched parenthesis at position 1\n"
    );
}

#[cfg(unix)]
#[test]
fn test_cli_invalid_utf8_argument() {
    use std::os::unix::ffi::OsStrExt;

    let output = infix_calc([OsStr::from_bytes(b"1 \xff 2")]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "E: unknown character `\u{FFFD}` at position 2\n"
    );
}
