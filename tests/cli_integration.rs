//! Integration tests driving the built `nullwalk` binary over the JSON
//! CFG fixtures under `tests/fixtures/`.
//!
//! These are smoke tests: CLI parsing works, a fixture loads, findings
//! show up in the requested output format. Deeper path-sensitivity
//! coverage lives in `tests/seed_scenarios.rs` and the unit tests beside
//! each `src/se/*.rs` module.

use std::path::PathBuf;
use std::process::Command;

struct TestOutput {
    stdout: String,
    stderr: String,
    status: std::process::ExitStatus,
}

impl TestOutput {
    fn success(&self) -> bool {
        self.status.success()
    }

    fn stdout_contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }
}

fn nullwalk_bin() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_nullwalk")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let debug_path = PathBuf::from("./target/debug/nullwalk");
            if debug_path.exists() {
                debug_path
            } else {
                PathBuf::from("./target/release/nullwalk")
            }
        })
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn run(args: &[&str]) -> TestOutput {
    let output = Command::new(nullwalk_bin()).args(args).output().expect("failed to run nullwalk");
    TestOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
    }
}

#[test]
fn check_reports_null_dereference_in_human_mode() {
    let fixture_path = fixture("scenario_2_null_deref.json");
    let out = run(&["check", fixture_path.to_str().unwrap()]);

    assert!(out.success(), "check should succeed: {}", out.stderr);
    assert!(out.stdout_contains("line 2"));
    assert!(out.stdout_contains("'a' is nullable here"));
}

#[test]
fn check_reports_null_dereference_in_json_mode() {
    let fixture_path = fixture("scenario_2_null_deref.json");
    let out = run(&["--output", "json", "check", fixture_path.to_str().unwrap()]);

    assert!(out.success(), "check --output json should succeed: {}", out.stderr);
    assert!(out.stdout_contains("\"tool\":\"nullwalk\""));
    assert!(out.stdout_contains("NullPointerException"));
}

#[test]
fn check_reports_tautology_on_an_always_false_condition() {
    let fixture_path = fixture("scenario_8_tautology.json");
    let out = run(&["check", fixture_path.to_str().unwrap()]);

    assert!(out.success(), "check should succeed: {}", out.stderr);
    assert!(out.stdout_contains("does not always evaluate to \"false\""));
}

#[test]
fn check_on_a_missing_file_exits_nonzero_with_a_file_not_found_code() {
    let out = run(&["--output", "json", "check", "tests/fixtures/does_not_exist.json"]);

    assert!(!out.success());
    assert!(out.stdout_contains("E003") || out.stdout_contains("FileNotFound"));
}

#[test]
fn check_on_malformed_json_exits_nonzero_with_an_invalid_input_code() {
    let mut path = std::env::temp_dir();
    path.push("nullwalk_bad_fixture.json");
    std::fs::write(&path, b"{ not valid json").unwrap();

    let out = run(&["--output", "json", "check", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);

    assert!(!out.success());
    assert!(out.stdout_contains("E002") || out.stdout_contains("InvalidInput"));
}

#[test]
fn explain_runs_without_a_fixture() {
    let out = run(&["explain"]);

    assert!(out.success());
    assert!(out.stdout_contains("null dereference"));
    assert!(out.stdout_contains("tautological condition"));
}
