//! Runs the `opov` binary against temporary input files.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn js_file(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("opov-cli-")
        .suffix(".js")
        .tempfile()
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn opov(args: &[&str], input: &NamedTempFile) -> Output {
    Command::new(env!("CARGO_BIN_EXE_opov"))
        .args(args)
        .arg(input.path())
        .env_remove("OPOV_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_transform_prints_rewritten_source() {
    let input = js_file("a + b;\n");
    let output = opov(&["transform"], &input);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("import \"operator-overload-polyfills\";\n((_lhs, _rhs) => {\n"));
    assert!(text.contains("  \"operator-overload disabled\";\n"));
    assert!(text.ends_with("})(a, b);\n"));
}

#[test]
fn test_transform_respects_indent_and_opt_in() {
    let input = js_file("a + b;\n");
    let output = opov(&["transform", "--indent", "4"], &input);
    assert!(stdout(&output).contains("\n    \"operator-overload disabled\";\n"));

    let output = opov(&["transform", "--default-disabled"], &input);
    assert_eq!(stdout(&output), "a + b;\n");
}

#[test]
fn test_run_uses_capabilities() {
    let input = js_file(
        "const v = { [Symbol.for('*')](k) { return 'scaled ' + k; } };\nconsole.log(v * 3);\nconsole.log(6 * 7);\n",
    );
    let output = opov(&["run"], &input);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "scaled 3\n42\n");
}

#[test]
fn test_run_reports_runtime_error() {
    let input = js_file("console.log('before');\nmissing();\n");
    let output = opov(&["run"], &input);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "before\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("runtime error"));
}

#[test]
fn test_check() {
    let good = js_file("let x = 1;\n");
    let output = opov(&["check"], &good);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with(": ok\n"));

    let bad = js_file("let = ;\n");
    let output = opov(&["check"], &bad);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_usage_error_exits_non_zero() {
    let input = js_file("");
    let output = opov(&["bogus"], &input);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: opov"));
}

#[test]
fn test_deep_operator_chain_fails_cleanly() {
    let input = js_file(&format!("x = {};\n", vec!["a"; 3_000].join(" + ")));
    let output = opov(&["transform"], &input);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nesting exceeds the limit of 256 levels"));
}
