//! Basic CLI E2E tests.
//!
//! Commands run against an isolated data directory via DAYPLAN_DATA_DIR,
//! always offline, so nothing touches the real store or network.

use std::process::Command;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &std::path::Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "dayplan-cli", "--quiet", "--"])
        .args(args)
        .env("DAYPLAN_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["task", "add", "Write tests", "--duration", "30"]);
    assert_eq!(code, 0, "task add failed");
    assert!(stdout.contains("Task created:"));

    let (stdout, _, code) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0, "task list failed");
    assert!(stdout.contains("Write tests"));

    let (stdout, _, code) = run_cli(dir.path(), &["task", "list", "--json"]);
    assert_eq!(code, 0, "task list --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_task_add_rejects_short_duration() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "Tiny", "--duration", "3"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("minimum"));
}

#[test]
fn test_plan_generate_and_show_offline() {
    let dir = tempfile::tempdir().unwrap();

    run_cli(dir.path(), &["task", "add", "Deep work", "--duration", "50"]);
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["plan", "generate", "--offline", "--start", "08:00", "--mode", "pomodoro"],
    );
    assert_eq!(code, 0, "plan generate failed");
    assert!(stdout.contains("Deep work"));
    assert!(stdout.contains("[break]"));

    let (stdout, _, code) = run_cli(dir.path(), &["plan", "show", "--start", "08:00"]);
    assert_eq!(code, 0, "plan show failed");
    assert!(stdout.contains("Deep work"));

    let (stdout, _, code) = run_cli(dir.path(), &["plan", "clear", "--start", "08:00"]);
    assert_eq!(code, 0, "plan clear failed");
    assert!(stdout.contains("Cleared"));

    let (stdout, _, code) = run_cli(dir.path(), &["plan", "show", "--start", "08:00"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No stored plan"));
}

#[test]
fn test_adaptive_plan_and_feedback_offline() {
    let dir = tempfile::tempdir().unwrap();

    run_cli(dir.path(), &["task", "add", "Focus block", "--duration", "60", "--splittable"]);
    let (stdout, _, code) = run_cli(
        dir.path(),
        &[
            "plan", "generate", "--offline", "--start", "09:00", "--mode", "adaptive",
            "--seed", "42",
        ],
    );
    assert_eq!(code, 0, "adaptive generate failed");
    assert!(stdout.contains("Break strategy:"));

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["feedback", "rate", "good", "--completed", "1", "--offline"],
    );
    assert_eq!(code, 0, "feedback rate failed");
    assert!(stdout.contains("Reward:"));

    let (stdout, _, code) = run_cli(dir.path(), &["feedback", "stats"]);
    assert_eq!(code, 0, "feedback stats failed");
    assert!(stdout.contains("Episodes: 1"));
}

#[test]
fn test_feedback_without_pending_episode_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["feedback", "rate", "okay", "--offline"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("No pending decision"));
}
