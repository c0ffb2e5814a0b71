//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use card_grade_test_support::{write_event, GradingEventBuilder};
use predicates::prelude::*;
use serde_json::Value;

/// Get path to test fixtures
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("card-grade-adapters/tests/fixtures")
}

/// Binary running in `cwd` with XDG config rooted at `xdg`.
fn card_grade_in(cwd: &Path, xdg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("card-grade").unwrap();
    cmd.current_dir(cwd).env("XDG_CONFIG_HOME", xdg);
    cmd
}

fn write_xdg_config(xdg: &Path, content: &str) {
    let dir = xdg.join("card-grade");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_project_config_applies_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[output]
format = 'json'
",
    )
    .unwrap();

    card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_cli_overrides_project_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[output]
format = 'json'
",
    )
    .unwrap();

    card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .args(["--format", "jsonl"])
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_config_found_in_parent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("batch").join("today");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[output]
format = 'json'
",
    )
    .unwrap();

    card_grade_in(&nested, &temp_dir.path().join("xdg"))
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_xdg_config_applies() {
    let temp_dir = tempfile::tempdir().unwrap();
    let xdg = temp_dir.path().join("xdg");
    write_xdg_config(
        &xdg,
        r"
[output]
format = 'json'
",
    );

    card_grade_in(temp_dir.path(), &xdg)
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_project_config_overrides_xdg() {
    let temp_dir = tempfile::tempdir().unwrap();
    let xdg = temp_dir.path().join("xdg");
    write_xdg_config(
        &xdg,
        r"
[output]
format = 'json'
",
    );
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[output]
format = 'jsonl'
",
    )
    .unwrap();

    card_grade_in(temp_dir.path(), &xdg)
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_config_variance_cut_points() {
    let temp_dir = tempfile::tempdir().unwrap();
    // finals 8, 9, 10 have variance 2/3: moderate by default, low here
    let event = GradingEventBuilder::with_finals([8.0, 9.0, 10.0]);
    let path = write_event(temp_dir.path(), "events/spread.json", &event).unwrap();
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[consensus]
high_max_variance = 0.1
moderate_max_variance = 0.5
",
    )
    .unwrap();

    let output = card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["aggregate"]["consistency"], "low");
}

#[test]
fn test_config_range_policy_warn() {
    let temp_dir = tempfile::tempdir().unwrap();
    let event = GradingEventBuilder::new(9.0).passes(vec![
        card_grade_test_support::uniform_pass_json(9.0),
        card_grade_test_support::uniform_pass_json(10.5),
        card_grade_test_support::uniform_pass_json(9.0),
    ]);
    let path = write_event(temp_dir.path(), "events/hot.json", &event).unwrap();

    // Rejected by default
    card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());

    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[consensus]
range_policy = 'warn'
",
    )
    .unwrap();

    let output = card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!report["aggregate"]["range_warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_config_value_warns() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[output]
format = 'xml'
",
    )
    .unwrap();

    card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("warning: output.format"))
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_unparseable_config_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join(".card-grade.toml"), "[output\nformat = 'json'").unwrap();

    card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(fixtures_dir().join("near_mint.json"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Failed to parse config file"))
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_config_recursive() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_event(temp_dir.path(), "cards/a/one.json", &GradingEventBuilder::new(9.0)).unwrap();
    write_event(temp_dir.path(), "cards/b/two.json", &GradingEventBuilder::new(8.0)).unwrap();

    let flat = card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(temp_dir.path().join("cards"))
        .output()
        .unwrap();
    assert!(flat.stdout.is_empty());

    fs::write(
        temp_dir.path().join(".card-grade.toml"),
        r"
[general]
recursive = true
",
    )
    .unwrap();

    let deep = card_grade_in(temp_dir.path(), &temp_dir.path().join("xdg"))
        .arg(temp_dir.path().join("cards"))
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&deep.stdout).lines().count(), 2);
}
