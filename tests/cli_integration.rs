//! Integration tests for the `knbn` CLI.
//!
//! Each test writes a todo.txt file into a temp directory, runs `knbn` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `knbn` binary.
fn knbn_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("knbn");
    path
}

const SAMPLE: &str = "\
(B) 2024-05-01 Write report +work @office
Call plumber @home knbn:in_progress
(A) Review PR +core knbn:validation

x 2024-05-10 2024-05-02 Ship release +work
Buy milk
";

/// Write the sample list and return its path.
fn create_test_list(root: &Path) -> PathBuf {
    let path = root.join("tasks.todo.txt");
    fs::write(&path, SAMPLE).unwrap();
    path
}

/// Run knbn with an isolated config dir so the user's own config is never read.
fn run_knbn(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(knbn_bin())
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run knbn");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_knbn_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_knbn(dir, args);
    if !success {
        panic!(
            "knbn {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .split('\n')
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_board_default_command() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt"]);
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("To Do (2, 40%)"), "{}", first);
    assert!(first.contains("In progress (1, 20%)"));
    assert!(first.contains("Validation (1, 20%)"));
    assert!(first.contains("Done (1, 20%)"));
    assert!(out.contains("#1 (B) Write report"));
    assert!(out.contains("#6 Buy milk"));
}

#[test]
fn test_board_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "board", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["counts"]["todo"], 2);
    assert_eq!(json["counts"]["done"], 1);
    let todo = json["columns"][0]["cards"].as_array().unwrap();
    // priority B sorts before no priority
    assert_eq!(todo[0]["raw_index"], 1);
    assert_eq!(todo[1]["raw_index"], 6);
    let done = &json["columns"][3]["cards"][0];
    assert_eq!(done["raw_index"], 5);
    assert_eq!(done["duration_days"], 8);
}

#[test]
fn test_stats_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "stats", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["total"], 5);
    assert_eq!(json["counts"]["in_progress"], 1);
    assert_eq!(json["percentages"]["todo"], 0.4);
}

#[test]
fn test_stats_empty_list_has_no_percentages() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("empty.todo.txt"), "\n\n").unwrap();
    let out = run_knbn_ok(tmp.path(), &["-f", "empty.todo.txt", "stats", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["total"], 0);
    assert!(json.get("percentages").is_none());
}

#[test]
fn test_show() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "show", "3"]);
    assert!(out.contains("line 3: (A) Review PR +core knbn:validation"));
    assert!(out.contains("stage: Validation"));
    assert!(out.contains("priority: A"));
    assert!(out.contains("projects: +core"));
}

#[test]
fn test_show_blank_line() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "show", "4"]);
    assert!(out.contains("(blank line)"));
}

// ---------------------------------------------------------------------------
// Stage commands
// ---------------------------------------------------------------------------

#[test]
fn test_start_appends_kanban_tag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "start", "6"]);
    assert!(out.contains("stage: In progress"));
    assert_eq!(read_lines(&path)[5], "Buy milk knbn:in_progress");
}

#[test]
fn test_done_prefixes_marker_and_drops_tag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "done", "2"]);
    assert_eq!(read_lines(&path)[1], "x Call plumber @home");
}

#[test]
fn test_move_back_to_todo() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "move", "5", "todo"]);
    assert_eq!(read_lines(&path)[4], "2024-05-10 2024-05-02 Ship release +work");
}

#[test]
fn test_move_is_idempotent() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "validate", "1"]);
    let once = fs::read_to_string(&path).unwrap();
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "validate", "1"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), once);
    assert_eq!(
        read_lines(&path)[0],
        "(B) 2024-05-01 Write report +work @office knbn:validation"
    );
}

#[test]
fn test_move_rejects_unknown_stage() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let (_, _, success) = run_knbn(tmp.path(), &["-f", "tasks.todo.txt", "move", "1", "later"]);
    assert!(!success);
}

// ---------------------------------------------------------------------------
// Priority and date commands
// ---------------------------------------------------------------------------

#[test]
fn test_priority_set_and_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "priority", "6", "C"]);
    assert_eq!(read_lines(&path)[5], "(C) Buy milk");
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "priority", "6"]);
    assert_eq!(read_lines(&path)[5], "Buy milk");
}

#[test]
fn test_cycle_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "cycle", "3"]);
    assert_eq!(read_lines(&path)[2], "Review PR +core knbn:validation");
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "cycle", "3"]);
    assert_eq!(read_lines(&path)[2], "(E) Review PR +core knbn:validation");
}

#[test]
fn test_date_inserts_after_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(
        tmp.path(),
        &["-f", "tasks.todo.txt", "date", "3", "--date", "2024-06-01"],
    );
    assert_eq!(
        read_lines(&path)[2],
        "(A) 2024-06-01 Review PR +core knbn:validation"
    );
}

#[test]
fn test_date_completes_a_started_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let out = run_knbn_ok(
        tmp.path(),
        &["-f", "tasks.todo.txt", "date", "1", "--date", "2024-05-04", "--json"],
    );
    assert_eq!(
        read_lines(&path)[0],
        "(B) 2024-05-04 2024-05-01 Write report +work @office"
    );
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["card"]["duration_days"], 3);
}

// ---------------------------------------------------------------------------
// Line commands
// ---------------------------------------------------------------------------

#[test]
fn test_up_and_down() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "up", "2"]);
    assert!(out.starts_with("line 1: Call plumber"));
    let lines = read_lines(&path);
    assert_eq!(lines[0], "Call plumber @home knbn:in_progress");
    assert_eq!(lines[1], "(B) 2024-05-01 Write report +work @office");

    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "down", "1"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_up_at_top_is_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "up", "1"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let out = run_knbn_ok(tmp.path(), &["-f", "tasks.todo.txt", "rm", "4"]);
    assert!(out.contains("removed line 4"));
    let lines = read_lines(&path);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[3], "x 2024-05-10 2024-05-02 Ship release +work");
}

#[test]
fn test_add_keeps_final_newline() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let out = run_knbn_ok(
        tmp.path(),
        &["-f", "tasks.todo.txt", "add", "(C)", "Water", "plants", "@home"],
    );
    assert!(out.starts_with("line 7: (C) Water plants @home"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("Buy milk\n(C) Water plants @home\n"));
}

#[test]
fn test_add_rejects_multiline_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let (_, stderr, success) = run_knbn(
        tmp.path(),
        &["-f", "tasks.todo.txt", "add", "first\nsecond"],
    );
    assert!(!success);
    assert!(stderr.contains("one line"));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_crlf_file_keeps_line_endings() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("dos.todo.txt");
    fs::write(&path, "Buy milk\r\nCall mom\r\n").unwrap();

    let out = run_knbn_ok(tmp.path(), &["-f", "dos.todo.txt", "start", "1"]);
    assert!(out.starts_with("line 1: Buy milk knbn:in_progress\n"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Buy milk knbn:in_progress\r\nCall mom\r\n"
    );
}

#[test]
fn test_reset_keeps_date_like_subject() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("dates.todo.txt");
    fs::write(&path, "(A) knbn:in_progress 2024-01-01 retro notes\n").unwrap();

    run_knbn_ok(tmp.path(), &["-f", "dates.todo.txt", "reset", "1"]);
    let out = run_knbn_ok(tmp.path(), &["-f", "dates.todo.txt", "show", "1", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["card"]["stage"], "todo");
    assert_eq!(json["card"]["subject"], "2024-01-01 retro notes");
    assert!(json["card"]["start_date"].is_null());
}

// ---------------------------------------------------------------------------
// Init and errors
// ---------------------------------------------------------------------------

#[test]
fn test_init_normalizes_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_knbn_ok(tmp.path(), &["init", "work"]);
    assert!(out.contains("work.todo.txt"));
    assert!(tmp.path().join("work.todo.txt").exists());

    let (_, stderr, success) = run_knbn(tmp.path(), &["init", "work.txt"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_out_of_range_line() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let (_, stderr, success) = run_knbn(tmp.path(), &["-f", "tasks.todo.txt", "done", "42"]);
    assert!(!success);
    assert!(stderr.contains("error: line 42 is out of range"));
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_missing_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_knbn(tmp.path(), &["-f", "nope.todo.txt", "board"]);
    assert!(!success);
    assert!(stderr.contains("could not read"));
}

#[test]
fn test_no_file_configured() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_knbn(tmp.path(), &["board"]);
    assert!(!success);
    assert!(stderr.contains("no todo.txt file given"));
}

#[test]
fn test_file_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = create_test_list(tmp.path());
    let config_dir = tmp.path().join("config").join("kanbantxt");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!(
            "file = {:?}\n\n[board.labels]\ntodo = \"Backlog\"\n",
            path.display().to_string()
        ),
    )
    .unwrap();

    let out = run_knbn_ok(tmp.path(), &["stats"]);
    assert!(out.starts_with("Backlog"), "{}", out);
}
