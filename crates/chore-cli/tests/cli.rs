use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn chores() -> Command {
    let mut cmd = Command::cargo_bin("chores").unwrap();
    cmd.env_remove("CHORES_STORE_PATH")
        .env_remove("CHORES_TIMEZONE")
        .env_remove("CHORES_LOG");
    cmd
}

/// A `chores` invocation against `store` with a fixed today.
fn chores_at(store: &Path, today: &str) -> Command {
    let mut cmd = chores();
    cmd.arg("--store").arg(store).arg("--today").arg(today);
    cmd
}

fn add_json(store: &Path, today: &str, args: &[&str]) -> serde_json::Value {
    let output = chores_at(store, today)
        .arg("--json")
        .arg("add")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── describe / next ─────────────────────────────────────────────────────────

#[test]
fn test_describe_monthly_by_date() {
    chores()
        .args(["describe", "--every", "monthly-by-date", "--day", "3"])
        .assert()
        .success()
        .stdout("Every month on the 3rd\n");
}

#[test]
fn test_describe_missing_field_prints_sentinel() {
    chores()
        .args(["describe", "--every", "yearly", "--month", "2"])
        .assert()
        .success()
        .stdout("Invalid yearly recurrence\n");
}

#[test]
fn test_next_biweekly() {
    chores()
        .args([
            "next",
            "--every",
            "weekly",
            "--interval",
            "2",
            "--start",
            "2024-01-01",
            "--on",
            "2024-01-10",
        ])
        .assert()
        .success()
        .stdout("2024-01-15\n");
}

#[test]
fn test_next_last_friday() {
    chores()
        .args([
            "next",
            "--every",
            "monthly-by-weekday",
            "--ordinal",
            "last",
            "--weekday",
            "friday",
            "--on",
            "2024-02-15",
        ])
        .assert()
        .success()
        .stdout("2024-03-29\n");
}

#[test]
fn test_next_leap_day_in_common_year() {
    chores()
        .args([
            "next",
            "--every",
            "yearly",
            "--month",
            "2",
            "--day",
            "29",
            "--start",
            "2024-01-01",
            "--on",
            "2025-01-10",
        ])
        .assert()
        .success()
        .stdout("2025-03-01\n");
}

#[test]
fn test_next_malformed_rule_prints_none() {
    chores()
        .args(["next", "--every", "monthly-by-date", "--on", "2024-01-01"])
        .assert()
        .success()
        .stdout("none\n");
}

#[test]
fn test_next_json() {
    let output = chores()
        .args([
            "--json", "next", "--every", "daily", "--on", "2024-06-12",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nextDueDate"], "2024-06-12");
    assert_eq!(value["description"], "Every day");
}

#[test]
fn test_bad_date_is_usage_error() {
    chores()
        .args(["next", "--every", "daily", "--on", "June 1st"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ── store-backed commands ───────────────────────────────────────────────────

#[test]
fn test_add_then_today_and_upcoming() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    chores_at(&store, "2024-06-12")
        .args(["add", "Water plants", "--every", "daily"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water plants"));
    chores_at(&store, "2024-06-12")
        .args(["add", "Mow lawn", "--every", "weekly"])
        .assert()
        .success();

    chores_at(&store, "2024-06-12")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Water plants"))
        .stdout(predicate::str::contains("Mow lawn").not());

    chores_at(&store, "2024-06-12")
        .arg("upcoming")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wednesday, June 19"))
        .stdout(predicate::str::contains("Mow lawn"));

    assert!(store.exists());
}

#[test]
fn test_add_with_unknown_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    chores_at(&store, "2024-06-12")
        .args(["add", "Dust", "--every", "daily", "--category", "attic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category not found: attic"));
}

#[test]
fn test_add_with_missing_rule_flags_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    chores_at(&store, "2024-06-12")
        .args(["add", "Birthday card", "--every", "yearly", "--month", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--day"));
    assert!(!store.exists());
}

#[test]
fn test_categories_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    chores_at(&store, "2024-06-12")
        .args(["category", "add", "kitchen", "Kitchen"])
        .assert()
        .success();
    add_json(
        &store,
        "2024-06-12",
        &["Clean oven", "--category", "kitchen", "--every", "monthly-by-date", "--day", "1"],
    );
    add_json(&store, "2024-06-12", &["Change oven light", "--every", "yearly", "--month", "1", "--day", "15"]);

    let output = chores_at(&store, "2024-06-12")
        .args(["--json", "search", "OVEN"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups[0]["title"], "Kitchen");
    assert_eq!(groups[0]["tasks"][0]["name"], "Clean oven");
    assert_eq!(groups[1]["title"], "Other Tasks");

    chores_at(&store, "2024-06-12")
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kitchen  Kitchen  (1)"));

    chores_at(&store, "2024-06-12")
        .args(["search", "vacuum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing found"));
}

#[test]
fn test_done_toggles_and_remove_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    let task = add_json(&store, "2024-06-12", &["Take out bins", "--every", "weekly"]);
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["nextDueDate"], "2024-06-19");

    chores_at(&store, "2024-06-12")
        .args(["done", &id])
        .assert()
        .success()
        .stdout("Completed Take out bins\n");
    chores_at(&store, "2024-06-12")
        .args(["done", &id])
        .assert()
        .success()
        .stdout("Reopened Take out bins\n");

    chores_at(&store, "2024-06-12")
        .args(["remove", &id])
        .assert()
        .success();
    chores_at(&store, "2024-06-12")
        .args(["done", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_past_due_dates_roll_forward() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");

    add_json(&store, "2024-06-12", &["Feed cat", "--every", "daily"]);
    add_json(&store, "2024-06-12", &["Mop floors", "--every", "weekly"]);

    // A week later the daily chore is stale; the weekly one is due that day.
    chores_at(&store, "2024-06-19")
        .arg("refresh")
        .assert()
        .success()
        .stdout("Rescheduled 1 task\n");

    chores_at(&store, "2024-06-19")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Feed cat"))
        .stdout(predicate::str::contains("Mop floors"));

    // Loading already refreshed and saved, so a second refresh has nothing to do.
    chores_at(&store, "2024-06-19")
        .arg("refresh")
        .assert()
        .success()
        .stdout("Rescheduled 0 tasks\n");
}

#[test]
fn test_malformed_store_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("tasks.json");
    std::fs::write(&store, "{ nope").unwrap();

    chores_at(&store, "2024-06-12")
        .arg("today")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chores error"))
        .stderr(predicate::str::contains("tasks.json"));
}
