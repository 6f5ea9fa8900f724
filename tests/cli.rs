// Drives the compiled binary's scripting subcommands against a temp state file.

use std::path::Path;

use assert_cmd::Command;
use tempfile::tempdir;

fn wordjar(home: &Path, state: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wordjar").unwrap();
    cmd.env("HOME", home)
        .arg("--state-file")
        .arg(state)
        .arg("--config")
        .arg(home.join("config.json"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn set_fields_then_report_json() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");

    stdout_of(wordjar(dir.path(), &state).args(["goal", "2000"]));
    stdout_of(wordjar(dir.path(), &state).args(["count", "500"]));
    stdout_of(wordjar(dir.path(), &state).args(["deadline", "+10"]));

    let out = stdout_of(wordjar(dir.path(), &state).args(["status", "--json"]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["word_count"], 500);
    assert_eq!(json["word_goal"], 2000);
    assert_eq!(json["days_left"], 10);
    assert_eq!(json["percent_achieved"], 25.0);
    assert_eq!(json["words_per_day_needed"], 150);

    let saved: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&state).unwrap()).unwrap();
    assert_eq!(saved["word_count"], 500);
    assert!(saved["deadline_date"].is_string());
    assert!(saved.get("percent_achieved").is_none());
}

#[test]
fn non_numeric_count_becomes_zero() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");

    stdout_of(wordjar(dir.path(), &state).args(["count", "300"]));
    let out = stdout_of(wordjar(dir.path(), &state).args(["count", "lots"]));
    assert!(out.contains("Word Count: 0"));
}

#[test]
fn negative_count_text_becomes_zero() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");

    stdout_of(wordjar(dir.path(), &state).args(["count", "300"]));
    let out = stdout_of(wordjar(dir.path(), &state).args(["count", "-5"]));
    assert!(out.contains("Word Count: 0"));

    let out = stdout_of(wordjar(dir.path(), &state).args(["goal", "-2000"]));
    assert!(out.contains("Word Goal: 0"));
}

#[test]
fn add_accumulates_words() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");

    stdout_of(wordjar(dir.path(), &state).args(["add", "120"]));
    let out = stdout_of(wordjar(dir.path(), &state).args(["add", "80"]));
    assert!(out.contains("Word Count: 200"));
}

#[test]
fn corrupt_state_reports_defaults() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");
    std::fs::write(&state, "{{{{").unwrap();

    let out = stdout_of(wordjar(dir.path(), &state).arg("status"));
    assert!(out.contains("Word Count: 0"));
    assert!(out.contains("Word Goal: 0"));
    assert!(out.contains("Percent of Goal Achieved: 0%"));
}

#[test]
fn unparseable_deadline_fails_without_touching_state() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("writing_data.json");

    wordjar(dir.path(), &state)
        .args(["deadline", "someday"])
        .assert()
        .failure();
    assert!(!state.exists());
}
