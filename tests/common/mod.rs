//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get an lrt command
pub fn lrt() -> Command {
    Command::new(cargo::cargo_bin!("lrt"))
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    lrt().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Write a small components file and return its path relative to the project
pub fn write_components_file(tmp: &TempDir) -> PathBuf {
    let body = r#"kind: components
title: Power supply
components:
  - family: capacitor
    hardware_id: 1
    description: C1 ceramic bypass
    subcategory_id: 1
    quality_id: 1
    environment_active_id: 2
    capacitance: 1.0e-7
    voltage_ratio: 0.4
    temperature_active: 45.0
  - family: inductor
    hardware_id: 2
    description: L1 power choke
    subcategory_id: 2
    family_id: 1
    quality_id: 1
    environment_active_id: 2
    temperature_active: 45.0
    current_ratio: 0.3
  - family: miscellaneous
    hardware_id: 3
    description: DS1 indicator lamp
    subcategory_id: 4
    environment_active_id: 2
    voltage_rated: 12.0
    current_ratio: 0.05
"#;
    write_record_file(tmp, "components.lrt.yaml", body)
}

/// Write a small FMEA file and return its path relative to the project
pub fn write_fmea_file(tmp: &TempDir) -> PathBuf {
    let body = r#"kind: fmea
title: Power supply FMEA
item_hazard_rate: 0.5
mission_time: 100.0
modes:
  - description: Short to ground
    severity: 5
    occurrence: 8
    detection: 7
    mode_ratio: 0.4
    effect_probability: 0.9
  - description: Output drift
    severity: 3
    occurrence: 4
    detection: 5
    mode_ratio: 0.6
"#;
    write_record_file(tmp, "fmea.lrt.yaml", body)
}

/// Write a growth file with exact failure times and return its relative path
pub fn write_growth_file(tmp: &TempDir) -> PathBuf {
    let body = r#"kind: growth
title: Prototype test program
termination_time: 100.0
confidence: 0.90
failures:
  - time: 2.7
  - time: 10.3
  - time: 30.6
  - time: 57.0
  - time: 61.3
  - time: 80.0
plan:
  mtbf_goal: 110.0
  mtbf_initial: 45.0
  total_time: 10000.0
  first_phase_time: 1000.0
  phases:
    - name: Phase 1
      cumulative_time: 1000.0
    - name: Phase 2
      cumulative_time: 4000.0
    - name: Phase 3
      cumulative_time: 10000.0
"#;
    write_record_file(tmp, "growth.lrt.yaml", body)
}

/// Write a survival file with right censored data and return its relative path
pub fn write_survival_file(tmp: &TempDir) -> PathBuf {
    let body = r#"kind: survival
title: Bearing life test
confidence: 0.95
observations:
  - time: 55.0
    status: event
  - time: 187.0
    status: event
  - time: 216.0
    status: event
  - time: 240.0
    status: censored
  - time: 244.0
    status: event
  - time: 335.0
    status: censored
  - time: 361.0
    status: event
  - time: 373.0
    status: event
  - time: 400.0
    status: censored
    quantity: 2
"#;
    write_record_file(tmp, "survival.lrt.yaml", body)
}

/// Write a survival file with interval censored data for the Turnbull fit
pub fn write_interval_survival_file(tmp: &TempDir) -> PathBuf {
    let body = r#"kind: survival
title: Inspection data
confidence: 0.90
observations:
  - time: 0.0
    right: 10.0
    status: interval
  - time: 10.0
    right: 20.0
    status: interval
    quantity: 2
  - time: 20.0
    status: censored
  - time: 15.0
    status: event
"#;
    write_record_file(tmp, "intervals.lrt.yaml", body)
}

fn write_record_file(tmp: &TempDir, name: &str, body: &str) -> PathBuf {
    let records = tmp.path().join("records");
    std::fs::create_dir_all(&records).unwrap();
    std::fs::write(records.join(name), body).unwrap();
    PathBuf::from("records").join(name)
}
