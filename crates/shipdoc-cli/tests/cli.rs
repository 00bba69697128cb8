//! End-to-end tests for the shipdoc binary.

use assert_cmd::Command;
use predicates::prelude::*;

const SAMPLE_CSV: &str = "\
# Shipper: Acme Exports
# Consignee: Global Imports
# Incoterm: FOB
# Currency: usd
# Reference: PO-12345

partNumber,description,quantity,netWeightKg,valueUsd,htsCode,countryOfOrigin
W123,Widget Assembly,10,125.5 kg,1500 USD,847150,us
G456,Gadget Kit,5,25 kg,USD 750,902710,CN
";

fn shipdoc() -> Command {
    Command::cargo_bin("shipdoc").expect("binary builds")
}

#[test]
fn ingests_csv_and_prints_canonical_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    shipdoc()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"checksums\""))
        .stdout(predicate::str::contains("\"htsCode\":\"847150\""))
        .stdout(predicate::str::contains("\"currency\":\"USD\""));
}

#[test]
fn writes_pretty_json_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.csv");
    let output = dir.path().join("canonical.json");
    std::fs::write(&input, SAMPLE_CSV).unwrap();

    shipdoc()
        .arg(&input)
        .arg("--pretty")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["checksums"]["quantity"], serde_json::json!(15.0));
    assert_eq!(parsed["meta"]["sourceType"], serde_json::json!("csv"));
}

#[test]
fn rejects_unsupported_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.txt");
    std::fs::write(&path, "not a shipment document").unwrap();

    shipdoc()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn rejects_missing_files() {
    shipdoc()
        .arg("does-not-exist.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn fails_on_csv_without_line_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "partNumber,description,quantity\n").unwrap();

    shipdoc()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no line items"));
}
