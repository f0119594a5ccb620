//! End-to-end tests for the twister-scripting binary

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write scripting file");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_twister-scripting"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run twister-scripting")
}

const RULES: &str = r#"
- scenarios: ["test_scenario1"]
  platforms: ["platform1"]
  pre_script: pre.sh
  comment: "Match 1"
- scenarios: [".*"]
  platforms: ["platform3"]
  comment: "Wildcard scenario"
"#;

#[test]
fn match_prints_scripts_of_first_rule() {
    let dir = tempdir().expect("Failed to create temp dir");
    let rules = write_source(&dir, "rules.yaml", RULES);
    let rules = rules.to_str().expect("utf-8 path");

    let output = run(&[
        "--scripting-list",
        rules,
        "match",
        "--scenario",
        "test_scenario1",
        "--platform",
        "platform1",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("comment: Match 1"));
    assert!(stdout.contains("pre_script: pre.sh"));

    let output = run(&[
        "--scripting-list",
        rules,
        "match",
        "--scenario",
        "any_scenario",
        "--platform",
        "platform3",
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("comment: Wildcard scenario"));
}

#[test]
fn missing_match_is_not_an_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let rules = write_source(&dir, "rules.yaml", RULES);

    let output = run(&[
        "--scripting-list",
        rules.to_str().expect("utf-8 path"),
        "match",
        "--scenario",
        "nonexistent_test",
        "--platform",
        "platform1",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "no matching scripting\n"
    );
}

#[test]
fn check_counts_rules_per_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let a = write_source(&dir, "a.yaml", RULES);
    let b = write_source(&dir, "b.yaml", "");

    let output = run(&[
        "--scripting-list",
        a.to_str().expect("utf-8 path"),
        "--scripting-list",
        b.to_str().expect("utf-8 path"),
        "check",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("a.yaml: 2 rules"));
    assert!(stdout.contains("b.yaml: 0 rules"));
    assert!(stdout.contains("total: 2 rules"));
}

#[test]
fn malformed_file_exits_with_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bad = write_source(&dir, "bad.yaml", "- comment: only a comment\n");

    let output = run(&["--scripting-list", bad.to_str().expect("utf-8 path"), "check"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.yaml"));
    assert!(stderr.contains("At least one of the properties must be specified"));
}
