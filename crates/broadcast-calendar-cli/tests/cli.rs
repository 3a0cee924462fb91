use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn bcal() -> Command {
    let mut cmd = Command::cargo_bin("bcal").unwrap();
    cmd.env_remove("BCAL_TZ").env_remove("BCAL_CUTOVER");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── week ────────────────────────────────────────────────────────────────

#[test]
fn test_week_record_for_instant() {
    let json = run_json(bcal().args(["week", "2025-01-10T19:00:00"]));
    assert_eq!(json["yearValue"], 2025);
    assert_eq!(json["quarterValue"], 1);
    assert_eq!(json["weekValue"], 2);
    assert_eq!(json["label"], "2025Q1W2");
    assert_eq!(json["weekStart"], "2025-01-10T19:00:00+00:00");
    assert_eq!(json["weekEnd"], "2025-01-17T19:00:00+00:00");
}

#[test]
fn test_week_one_ms_before_cutover() {
    let json = run_json(bcal().args(["week", "2025-01-10T18:59:59.999"]));
    assert_eq!(json["label"], "2025Q1W1");
}

#[test]
fn test_week_defaults_to_now() {
    let json = run_json(bcal().arg("week"));
    assert!(json["weekValue"].as_u64().unwrap() >= 1);
    assert!((1..=4).contains(&json["quarterValue"].as_u64().unwrap()));
}

#[test]
fn test_week_timezone_flag() {
    let json = run_json(bcal().args(["--tz", "Asia/Tokyo", "week", "2025-01-03T10:30:00Z"]));
    assert_eq!(json["label"], "2025Q1W1");
    assert_eq!(json["instant"], "2025-01-03T19:30:00+09:00");
}

#[test]
fn test_week_timezone_from_env() {
    let json = run_json(
        bcal()
            .env("BCAL_TZ", "America/New_York")
            .args(["week", "2025-01-03T10:30:00Z"]),
    );
    assert_eq!(json["label"], "2024Q4W13");
}

#[test]
fn test_week_custom_cutover() {
    let json = run_json(bcal().args(["--cutover", "sat@06:00", "week", "2025-01-11T06:00"]));
    assert_eq!(json["label"], "2025Q1W2");
}

#[test]
fn test_week_invalid_instant() {
    bcal()
        .args(["week", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse instant"))
        .stderr(predicate::str::contains("Invalid datetime"));
}

#[test]
fn test_invalid_timezone() {
    bcal()
        .args(["--tz", "Invalid/Zone", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_invalid_cutover() {
    bcal()
        .args(["--cutover", "funday@19:00", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid cutover"));
}

// ── anchor / weeks ──────────────────────────────────────────────────────

#[test]
fn test_anchor_saturday_quarter() {
    let json = run_json(bcal().args(["anchor", "2022Q1"]));
    assert_eq!(json["anchor"], "2021-12-31T19:00:00+00:00");
    assert_eq!(json["local"], "2021-12-31 19:00:00");
    assert_eq!(json["weekday"], "Friday");
}

#[test]
fn test_anchor_invalid_quarter() {
    bcal()
        .args(["anchor", "2025Q7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quarter"));
}

#[test]
fn test_weeks_table() {
    let json = run_json(bcal().args(["weeks", "2023Q3"]));
    assert_eq!(json["weeks"], 14);
    assert_eq!(json["start"], "2023-06-30T19:00:00+00:00");
    assert_eq!(json["end"], "2023-10-06T19:00:00+00:00");
    let table = json["table"].as_array().unwrap();
    assert_eq!(table.len(), 14);
    assert_eq!(table[0]["label"], "2023Q3W1");
    assert_eq!(table[13]["end"], json["end"]);
}

// ── status / shift ──────────────────────────────────────────────────────

#[test]
fn test_status_past_current_future() {
    let now = "2025-01-12T12:00";
    for (scheduled, expected) in [
        ("2025-01-10T18:00", "past"),
        ("2025-01-10T19:30", "current"),
        ("2025-01-17T19:00", "future"),
    ] {
        let json = run_json(bcal().args(["status", scheduled, "--now", now]));
        assert_eq!(json["status"], expected, "{scheduled}");
    }
}

#[test]
fn test_status_reports_records() {
    let json = run_json(bcal().args(["status", "2025-01-10T18:00", "--now", "2025-01-12T12:00"]));
    assert_eq!(json["scheduled"]["weekValue"], 1);
    assert_eq!(json["current"]["weekValue"], 2);
}

#[test]
fn test_shift_forward_across_year() {
    let json = run_json(bcal().args(["shift", "2024Q4W13", "1"]));
    assert_eq!(json["label"], "2025Q1W1");
    assert_eq!(json["record"]["yearValue"], 2025);
}

#[test]
fn test_shift_negative_delta() {
    let json = run_json(bcal().args(["shift", "2025Q1W1", "-1"]));
    assert_eq!(json["label"], "2024Q4W13");
}

#[test]
fn test_shift_week_outside_quarter() {
    bcal()
        .args(["shift", "2025Q1W20", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid week record"));
}
