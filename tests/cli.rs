//! Command-line front end tests

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const PROGRAM: &str = "G0 X0 Y0\nG1 Z-1 F200\nG1 X20\nG2 X20 Y-20 I0 J-10\nG1 X12.3.4\n";

fn run(args: &[&str], dir: &Path) -> std::process::Output {
    let program = dir.join("part.nc");
    std::fs::write(&program, PROGRAM).unwrap();
    // Point the default config lookup at an empty directory
    Command::new(env!("CARGO_BIN_EXE_ncview"))
        .arg(&program)
        .args(args)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .output()
        .unwrap()
}

#[test]
fn test_summary_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    let output = run(&[], dir.path());
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("segments:    3"));
    assert!(stdout.contains("0 error(s), 1 warning(s)"));
    assert!(stdout.contains("line 5"));
}

#[test]
fn test_json_output_parses() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--format", "json"], dir.path());
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["segments"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_svg_uses_configured_colours() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("view.toml");
    std::fs::write(&config, "[display]\narc = \"purple\"\n").unwrap();
    let output = run(
        &["--format", "svg", "--config", config.to_str().unwrap()],
        dir.path(),
    );
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"stroke="purple""#));
}

#[test]
fn test_strict_mode() {
    let dir = TempDir::new().unwrap();
    // Only a malformed-token warning
    assert!(run(&["--strict"], dir.path()).status.success());

    let program = dir.path().join("bad.nc");
    std::fs::write(&program, "G0 X0 Y0\nG2 X30 Y0 R5\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_ncview"))
        .arg(&program)
        .arg("--strict")
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn test_invalid_viewport_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--width", "0"], dir.path());
    assert!(!output.status.success());
}

#[test]
fn test_missing_input_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_ncview"))
        .arg("does-not-exist.nc")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
