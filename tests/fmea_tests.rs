//! FMEA command tests

mod common;

use common::{lrt, setup_test_project, write_fmea_file};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_fmea_prints_rpn_for_every_mode() {
    let tmp = setup_test_project();
    let path = write_fmea_file(&tmp);

    lrt()
        .current_dir(tmp.path())
        .args(["fmea", "--input", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Short to ground"))
        .stdout(predicate::str::contains("Output drift"))
        // severity 5 x occurrence 8 x detection 7
        .stdout(predicate::str::contains("280"));
}

#[test]
fn test_fmea_reports_item_criticality() {
    let tmp = setup_test_project();
    let path = write_fmea_file(&tmp);

    lrt()
        .current_dir(tmp.path())
        .args(["fmea", "--input", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("item criticality"))
        .stdout(predicate::str::contains("100 h mission"));
}

#[test]
fn test_fmea_json_output_carries_criticality() {
    let tmp = setup_test_project();
    let path = write_fmea_file(&tmp);

    let output = lrt()
        .current_dir(tmp.path())
        .args([
            "fmea",
            "--input",
            path.to_str().unwrap(),
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_part = &stdout[..stdout.rfind(']').unwrap() + 1];
    let rows: serde_json::Value = serde_json::from_str(json_part).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0]["mode_criticality"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_fmea_rejects_out_of_range_rating() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("records/bad.lrt.yaml"),
        "kind: fmea\nitem_hazard_rate: 1.0\nmission_time: 10.0\nmodes:\n  - description: Broken\n    severity: 11\n    occurrence: 8\n    detection: 7\n",
    )
    .unwrap();

    lrt()
        .current_dir(tmp.path())
        .args(["fmea", "--input", "records/bad.lrt.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Broken"));
}
