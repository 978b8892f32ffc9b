//! CLI surface, init, config, new and validate tests

mod common;

use common::{lrt, setup_test_project, write_fmea_file};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    lrt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reliability"));
}

#[test]
fn test_version_displays() {
    lrt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lrt"));
}

#[test]
fn test_unknown_command_fails() {
    lrt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    lrt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".lrt").is_dir());
    assert!(tmp.path().join(".lrt/config.yaml").is_file());
    assert!(tmp.path().join("records").is_dir());
    assert!(tmp.path().join("data").is_dir());
}

#[test]
fn test_init_force_reinitializes() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_show_prints_defaults() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("confidence"));
}

#[test]
fn test_config_keys_lists_known_keys() {
    lrt()
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("author"))
        .stdout(predicate::str::contains("environment_id"));
}

#[test]
fn test_config_set_and_show_roundtrip() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["config", "set", "author", "Jane Doe"])
        .assert()
        .success();

    lrt()
        .current_dir(tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

// ============================================================================
// New Command Tests
// ============================================================================

#[test]
fn test_new_writes_starter_file() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["new", "growth", "--title", "Demo program"])
        .assert()
        .success()
        .stdout(predicate::str::contains("growth.lrt.yaml"));

    let body = fs::read_to_string(tmp.path().join("records/growth.lrt.yaml")).unwrap();
    assert!(body.contains("kind: growth"));
    assert!(body.contains("Demo program"));
}

#[test]
fn test_new_rejects_unknown_kind() {
    let tmp = setup_test_project();

    lrt()
        .current_dir(tmp.path())
        .args(["new", "widget"])
        .assert()
        .failure();
}

#[test]
fn test_new_generated_files_validate() {
    let tmp = setup_test_project();

    for kind in ["records", "fmea", "growth", "survival"] {
        lrt()
            .current_dir(tmp.path())
            .args(["new", kind, "--force"])
            .assert()
            .success();
    }

    lrt()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("passed validation"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_accepts_good_file() {
    let tmp = setup_test_project();
    let path = write_fmea_file(&tmp);

    lrt()
        .current_dir(tmp.path())
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) passed validation"));
}

#[test]
fn test_validate_lists_violations() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("records/bad.lrt.yaml"),
        "kind: fmea\nmodes:\n  - description: Broken\n    severity: 0\n    occurrence: 8\n    detection: 7\n",
    )
    .unwrap();

    lrt()
        .current_dir(tmp.path())
        .args(["validate", "records/bad.lrt.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("violation"))
        .stdout(predicate::str::contains("severity"));
}

#[test]
fn test_validate_rejects_missing_kind() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("records/odd.lrt.yaml"), "title: nothing else\n").unwrap();

    lrt()
        .current_dir(tmp.path())
        .args(["validate", "records/odd.lrt.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("kind"));
}

#[test]
fn test_validate_keep_going_checks_everything() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("records/bad.lrt.yaml"),
        "kind: growth\ntermination_time: -5.0\n",
    )
    .unwrap();
    write_fmea_file(&tmp);

    lrt()
        .current_dir(tmp.path())
        .args(["validate", "--keep-going"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("fmea.lrt.yaml"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_generates_bash_script() {
    lrt()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lrt"));
}
