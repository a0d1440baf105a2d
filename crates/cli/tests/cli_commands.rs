use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::*;
use tempfile::tempdir;

/// Write the standard fixture pair: a binary address list at its static base
/// and a trace slid up by 0x4000 with one unmapped excursion at indices 2-3.
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let trace = dir.join("trace.txt");
    let addresses = dir.join("addresses.txt");
    fs::write(&trace, "0x5000\n0x5004\n0x9999\n0x9999\n0x5008\n").expect("write trace");
    fs::write(&addresses, "0x1000\n0x1004\n0x1008\n").expect("write addresses");
    (trace, addresses)
}

#[test]
fn analyze_reports_slide_and_entry_points() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .assert()
        .success()
        .stdout(predicate::str::contains("Slide: -0x4000"))
        .stdout(predicate::str::contains("Unmapped entry points: 1"));
}

#[test]
fn analyze_json_report_is_well_formed() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());

    let output = assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    // The reader interns the repeated 0x9999, which never votes anyway; the
    // three mapped table entries each contribute one vote.
    assert_eq!(report["slide"], -0x4000);
    assert_eq!(report["slide_hex"], "-0x4000");
    assert_eq!(report["support"], 3);
    assert_eq!(report["instruction_count"], 5);
    assert_eq!(report["unmapped_entry_points"], 1);
    assert_eq!(report["regions"][0]["runtime_lo"], "0x5000");
    assert_eq!(report["regions"][0]["runtime_hi"], "0x5008");
    assert!(report["trace_sha256"].as_str().map(|s| s.len() == 64).unwrap_or(false));
    assert!(report["generated_at"].as_str().is_some());
}

#[test]
fn analyze_accepts_a_yaml_config() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());
    let config = dir.path().join("config.yml");
    fs::write(&config, "page_mask: 4095\n").expect("write config");

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Page mask: 0xfff"));
}

#[test]
fn rebase_maps_between_address_spaces() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("rebase")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--address")
        .arg("0x1004")
        .assert()
        .success()
        .stdout(predicate::str::contains("0x1004 -> 0x5004"));

    // Addresses outside the region pass through unchanged.
    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("rebase")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--address")
        .arg("0xdead0000")
        .assert()
        .success()
        .stdout(predicate::str::contains("0xdead0000 -> 0xdead0000"));
}

#[test]
fn prev_mapped_prints_the_transition_index() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("prev-mapped")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--idx")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("prev-mapped")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .arg("--idx")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::diff("-1\n"));
}

#[test]
fn analyze_fails_for_missing_trace_file() {
    let dir = tempdir().expect("tempdir");
    let (_trace, addresses) = write_fixtures(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(dir.path().join("nonexistent.txt"))
        .arg("--addresses")
        .arg(&addresses)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load trace"));
}

#[test]
fn analyze_fails_for_malformed_address_list() {
    let dir = tempdir().expect("tempdir");
    let (trace, addresses) = write_fixtures(dir.path());
    fs::write(&addresses, "0x1000\ngarbage-line\n").expect("overwrite addresses");

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load address list"));
}

#[test]
fn analyze_fails_without_correlation_evidence() {
    let dir = tempdir().expect("tempdir");
    let trace = dir.path().join("trace.txt");
    let addresses = dir.path().join("addresses.txt");
    // Low bits never coincide, so no slide candidate gets a vote.
    fs::write(&trace, "0x8004\n").expect("write trace");
    fs::write(&addresses, "0x1000\n").expect("write addresses");

    assert_cmd::cargo::cargo_bin_cmd!("tracewalk")
        .arg("analyze")
        .arg("--trace")
        .arg(&trace)
        .arg("--addresses")
        .arg(&addresses)
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient evidence"));
}
