//! E2E CLI tests for the core calendar surface: add, move, remove,
//! space, list, summary, export, and import.
//!
//! Each test runs `alm` as a subprocess against a calendar file in an
//! isolated temp directory, with the clock pinned via `--now`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const NOW: &str = "2025-06-01 08:00";

/// Build a Command targeting the alm binary, pointed at `calendar`.
fn alm_cmd(calendar: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("alm"));
    cmd.env("ALMANAC_CALENDAR", calendar);
    // Suppress tracing output that goes to stderr
    cmd.env("ALMANAC_LOG", "error");
    cmd.args(["--now", NOW]);
    cmd
}

/// Create an event and assert it was applied.
fn add_event(calendar: &Path, title: &str, date: &str, time: &str, duration: Option<&str>) {
    let mut cmd = alm_cmd(calendar);
    cmd.args(["add", "--title", title, "--date", date, "--time", time]);
    if let Some(minutes) = duration {
        cmd.args(["--duration", minutes]);
    }
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 change"));
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be UTF-8")
}

// ---------------------------------------------------------------------------
// Create / Read
// ---------------------------------------------------------------------------

#[test]
fn add_then_list_shows_the_event() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", Some("30"));

    let listing = stdout_of(alm_cmd(&cal).arg("list"));
    assert!(listing.contains("2025-06-02 09:00-09:30 Standup (30 min)"));
}

#[test]
fn summary_groups_by_day_and_counts() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", Some("30"));
    add_event(&cal, "Review", "2025-06-03", "14:00", None);

    let summary = stdout_of(alm_cmd(&cal).arg("summary"));
    assert!(summary.contains("2025-06-02"));
    assert!(summary.contains("09:00-09:30 Standup"));
    assert!(summary.contains("14:00-15:00 Review"));
    assert!(summary.contains("Total events: 2"));
}

#[test]
fn add_json_contract() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    let out = stdout_of(alm_cmd(&cal).args([
        "--json", "add", "--title", "Standup", "--date", "2025-06-02", "--time", "09:00",
    ]));
    let json: Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(json["applied"], 1);
    assert_eq!(json["replies"], serde_json::json!([]));
}

#[test]
fn list_json_rows_carry_camel_case_duration() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", Some("30"));

    let out = stdout_of(alm_cmd(&cal).args(["--json", "list"]));
    let rows: Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(rows[0]["title"], "Standup");
    assert_eq!(rows[0]["date"], "2025-06-02");
    assert_eq!(rows[0]["durationMinutes"], 30);
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[test]
fn move_steps_past_a_conflicting_event() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Focus", "2025-06-02", "09:00", Some("60"));
    add_event(&cal, "Standup", "2025-06-03", "09:00", Some("30"));

    // 09:00 and 09:30 collide with Focus; the first free slot is 10:00.
    alm_cmd(&cal)
        .args([
            "move",
            "--title",
            "Standup",
            "--date",
            "2025-06-03",
            "--time",
            "09:00",
            "--new-date",
            "2025-06-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 change"));

    let listing = stdout_of(alm_cmd(&cal).arg("list"));
    assert!(listing.contains("2025-06-02 10:00-10:30 Standup"));
}

#[test]
fn remove_of_a_missing_event_is_a_noop() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", None);
    let before = std::fs::read_to_string(&cal).expect("calendar exists");

    alm_cmd(&cal)
        .args([
            "remove", "--title", "Standup", "--date", "2025-06-02", "--time", "10:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 0 changes"));

    let after = std::fs::read_to_string(&cal).expect("calendar exists");
    assert_eq!(before, after, "a matched-nothing delete must not rewrite");
}

#[test]
fn past_edits_are_skipped_unless_allowed() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    // 2025-05-30 is before the pinned clock.
    alm_cmd(&cal)
        .args([
            "add", "--title", "Old", "--date", "2025-05-30", "--time", "09:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 0 changes"));

    alm_cmd(&cal)
        .args([
            "--allow-past",
            "add",
            "--title",
            "Old",
            "--date",
            "2025-05-30",
            "--time",
            "09:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 change"));
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[test]
fn space_pushes_crowded_events_apart() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Focus", "2025-06-02", "09:00", Some("60"));
    add_event(&cal, "Standup", "2025-06-02", "10:30", Some("30"));

    alm_cmd(&cal)
        .args(["space", "--gap", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 1 change"));

    let listing = stdout_of(alm_cmd(&cal).arg("list"));
    assert!(listing.contains("2025-06-02 11:00-11:30 Standup"));

    // Running it again finds nothing to do.
    alm_cmd(&cal)
        .args(["space", "--gap", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 0 changes"));
}

#[test]
fn rebalance_relieves_a_crowded_day() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    // Monday 2025-06-02 has three events, the rest of the week none.
    add_event(&cal, "One", "2025-06-02", "09:00", Some("30"));
    add_event(&cal, "Two", "2025-06-02", "11:00", Some("30"));
    add_event(&cal, "Three", "2025-06-02", "13:00", Some("30"));

    // Pin the clock inside the week being balanced (2025-06-01 is a
    // Sunday, which would put these events in next week).
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("alm"));
    cmd.env("ALMANAC_CALENDAR", &cal)
        .env("ALMANAC_LOG", "error")
        .args(["--now", "2025-06-02 08:00", "--json", "rebalance"]);
    let out = stdout_of(&mut cmd);
    let json: Value = serde_json::from_str(&out).expect("valid JSON");
    let moved = json["applied"].as_u64().expect("applied count");
    assert!(moved >= 1, "a 3-0 spread should move something");

    let listing = stdout_of(alm_cmd(&cal).arg("list"));
    let monday_events = listing
        .lines()
        .filter(|line| line.starts_with("2025-06-02"))
        .count();
    assert!(monday_events < 3, "monday should have been relieved");
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[test]
fn export_prints_the_ical_document() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", None);

    let doc = stdout_of(alm_cmd(&cal).arg("export"));
    assert!(doc.starts_with("BEGIN:VCALENDAR"));
    assert!(doc.contains("SUMMARY:Standup"));
    assert!(doc.contains("DTSTART:20250602T090000"));
    assert!(doc.trim_end().ends_with("END:VCALENDAR"));
}

#[test]
fn import_replaces_the_document() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", None);

    let replacement = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:u1\r\nSUMMARY:Imported\r\nDTSTART:20250610T120000\r\nDTEND:20250610T130000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
    alm_cmd(&cal)
        .arg("import")
        .write_stdin(replacement)
        .assert()
        .success()
        .stdout(predicate::str::contains("Calendar replaced"));

    let listing = stdout_of(alm_cmd(&cal).arg("list"));
    assert!(listing.contains("Imported"));
    assert!(!listing.contains("Standup"));
}

#[test]
fn import_rejects_garbage_and_keeps_the_original() {
    let tmp = TempDir::new().expect("tempdir");
    let cal = tmp.path().join("calendar.ics");

    add_event(&cal, "Standup", "2025-06-02", "09:00", None);
    let before = std::fs::read_to_string(&cal).expect("calendar exists");

    alm_cmd(&cal)
        .arg("import")
        .write_stdin("not a calendar at all")
        .assert()
        .failure();

    let after = std::fs::read_to_string(&cal).expect("calendar exists");
    assert_eq!(before, after, "a rejected upload must leave the file intact");
}
