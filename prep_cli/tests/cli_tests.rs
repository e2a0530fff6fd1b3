//! Integration tests for the spmc binary.
//!
//! Every test pins `--tz UTC` and points `--config` at a temp file so the
//! output does not depend on the machine running it.

use assert_cmd::Command;
use base64::Engine;
use chrono::{NaiveDate, NaiveTime};
use predicates::prelude::*;
use prep_core::{encode, SachetCount, ScheduleInput};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = format!(
        "[share]\nbase_url = \"https://dosing.example\"\n\n[documents]\noutput_dir = {:?}\n",
        dir.path().join("docs")
    );
    fs::write(dir.path().join("config.toml"), config).expect("Failed to write config");
    dir
}

/// CLI bound to the test's config file, in UTC
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("spmc"));
    cmd.env_remove("RUST_LOG")
        .arg("--tz")
        .arg("UTC")
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn jane_token(sachets: SachetCount) -> String {
    let input = ScheduleInput::new(
        "Jane Doe",
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        sachets,
    )
    .unwrap();
    encode(&input)
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("spmc"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SPMC bowel preparation dosing schedule",
        ));
}

#[test]
fn test_new_prints_timeline_and_link() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["new", "--name", "Jane Doe", "--date", "2025-06-10"])
        .args(["--time", "2:00 PM", "--sachets", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last Meal"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 12:00 AM"))
        .stdout(predicate::str::contains("Dose 1"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 3:00 AM"))
        .stdout(predicate::str::contains("Dose 3"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 9:00 AM"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 2:00 PM"))
        .stdout(predicate::str::contains(format!(
            "https://dosing.example/?data={}",
            jane_token(SachetCount::Three)
        )));
}

#[test]
fn test_new_accepts_24_hour_time() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["new", "--name", "Jane Doe", "--date", "2025-06-10"])
        .args(["--time", "14:00", "--sachets", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tuesday, June 10th at 3:00 AM"))
        .stdout(predicate::str::contains("Dose 2"))
        .stdout(predicate::str::contains("Dose 3").not());
}

#[test]
fn test_new_json_output() {
    let dir = setup_test_dir();

    let output = cli(dir.path())
        .args(["new", "--name", "Jane Doe", "--date", "2025-06-10"])
        .args(["--time", "14:00", "--sachets", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["schedule"]["patientName"], "Jane Doe");
    assert_eq!(json["schedule"]["doses"].as_array().unwrap().len(), 2);
    assert!(json["schedule"]["lastMealTime"]
        .as_str()
        .unwrap()
        .starts_with("2025-06-10T03:00:00"));
    assert_eq!(json["token"], jane_token(SachetCount::Two));
}

#[test]
fn test_new_reports_every_invalid_field() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["new", "--name", "J", "--date", "2025-02-30"])
        .args(["--time", "25:00", "--sachets", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Patient name must be at least 2 characters.",
        ))
        .stderr(predicate::str::contains("procedureDate"))
        .stderr(predicate::str::contains("procedureTime"))
        .stderr(predicate::str::contains("sachets"));
}

#[test]
fn test_open_full_link() {
    let dir = setup_test_dir();
    let link = format!(
        "https://dosing.example/?data={}",
        jane_token(SachetCount::Three)
    );

    cli(dir.path())
        .args(["open", &link])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 6:00 AM"));
}

#[test]
fn test_open_message_text() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["open", &jane_token(SachetCount::Two), "--message"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Dosing Schedule for Jane Doe:"))
        .stdout(predicate::str::contains("*Dose 2:* Tuesday, Jun 10 @ 9:00 AM"));
}

#[test]
fn test_open_invalid_link_fails() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["open", "https://dosing.example/?data=not-a-token!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link"));
}

#[test]
fn test_open_out_of_range_link_shows_notice_and_fields() {
    let dir = setup_test_dir();
    let json = r#"{"patientName":"Jane","procedureDate":"2025-06-10","procedureTime":"14:00","sachets":"5"}"#;
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json);

    cli(dir.path())
        .args(["open", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid link: The shared schedule link is invalid. Please create a new one.",
        ))
        .stderr(predicate::str::contains("  - sachets:"));
}

#[test]
fn test_open_percent_encoded_padded_link() {
    let dir = setup_test_dir();
    let json = r#"{"patientName":"Jane Q Doe","procedureDate":"2025-06-10","procedureTime":"14:00","sachets":"2"}"#;
    let padded = base64::engine::general_purpose::URL_SAFE.encode(json);
    assert!(padded.ends_with('='));
    let link = format!("https://dosing.example/?data={}", padded.replace('=', "%3D"));

    cli(dir.path())
        .args(["open", &link])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Q Doe"))
        .stdout(predicate::str::contains("Tuesday, June 10th at 6:00 AM"));
}

#[test]
fn test_new_reports_unparseable_12_hour_time() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["new", "--name", "Jane Doe", "--date", "2025-06-10"])
        .args(["--time", "2:75 PM", "--sachets", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("  - procedureTime:"))
        .stdout(predicate::str::contains("Share link").not());
}

#[test]
fn test_new_rejects_space_padded_date() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["new", "--name", "Jane Doe", "--date", "2025- 6-10"])
        .args(["--time", "14:00", "--sachets", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("  - procedureDate:"));
}

#[test]
fn test_open_link_without_data_fails() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["open", "https://dosing.example/?foo=bar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link"));
}

#[test]
fn test_document_writes_both_languages() {
    let dir = setup_test_dir();
    let out = dir.path().join("out");

    cli(dir.path())
        .args(["document", &jane_token(SachetCount::Three), "--lang", "both"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let en = fs::read_to_string(out.join("SPMC_Schedule_Jane_Doe_en.txt")).unwrap();
    assert!(en.contains("Jane Doe"));
    assert!(out.join("SPMC_Schedule_Jane_Doe_ar.txt").exists());
}

#[test]
fn test_document_uses_configured_output_dir() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["document", &jane_token(SachetCount::Two), "--lang", "ar"])
        .assert()
        .success();

    let docs = dir.path().join("docs");
    assert!(docs.join("SPMC_Schedule_Jane_Doe_ar.txt").exists());
    assert!(!docs.join("SPMC_Schedule_Jane_Doe_en.txt").exists());
}

#[test]
fn test_document_invalid_link_writes_nothing() {
    let dir = setup_test_dir();
    let out = dir.path().join("out");

    cli(dir.path())
        .args(["document", "@@@"])
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid link"));

    assert!(!out.exists());
}

#[test]
fn test_times_lists_half_hour_slots() {
    let dir = setup_test_dir();

    let output = cli(dir.path()).arg("times").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 48);
    assert_eq!(lines[0], "12:00 AM");
    assert_eq!(lines[1], "12:30 AM");
    assert_eq!(lines[47], "11:30 PM");
}

#[test]
fn test_unknown_time_zone_fails() {
    let dir = setup_test_dir();

    Command::new(assert_cmd::cargo::cargo_bin!("spmc"))
        .arg("--tz")
        .arg("Mars/Olympus_Mons")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("times")
        .assert()
        .failure();
}
