//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use focustimer_core::{Session, SessionStore, SqliteStore};

const DAY: &str = "2026-10-14";

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_focustimer-cli"));
    cmd.env("FOCUSTIMER_DATA_DIR", data_dir)
        .env_remove("FOCUSTIMER_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(data_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run `focus run` feeding `input` on stdin.
fn run_interactive(data_dir: &Path, input: &str) -> (String, i32) {
    let mut child = cli(data_dir)
        .args(["focus", "run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn seed(data_dir: &Path, sessions: &[Session]) {
    let db = SqliteStore::open_at(&data_dir.join("focustimer.db")).unwrap();
    let mut store = SessionStore::new(db);
    for session in sessions {
        store.append(&session.date, session.clone()).unwrap();
    }
}

#[test]
fn test_break_compute() {
    let dir = tempfile::tempdir().unwrap();
    let (out, _, code) = run_cli(dir.path(), &["break", "compute", "1600", "--raw"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "310");

    let (out, _, code) = run_cli(dir.path(), &["break", "compute", "750"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "2:30 (150s)");
}

#[test]
fn test_sessions_list_and_count() {
    let dir = tempfile::tempdir().unwrap();
    seed(
        dir.path(),
        &[Session::new(DAY, 900, false), Session::new(DAY, 65, true)],
    );

    let (out, _, code) = run_cli(dir.path(), &["sessions", "count", "--date", DAY]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "2");

    let (out, _, code) = run_cli(dir.path(), &["sessions", "list", "--date", DAY]);
    assert_eq!(code, 0);
    assert!(out.contains("Session 1: 15:00"));
    assert!(out.contains("Session 2: 25:00 + 1:05"));

    let (out, _, code) = run_cli(dir.path(), &["sessions", "count", "--date", "2026-10-13"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "0");
}

#[test]
fn test_sessions_list_json() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path(), &[Session::new(DAY, 900, false)]);

    let (out, _, code) = run_cli(dir.path(), &["sessions", "list", "--date", DAY, "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let sessions = parsed.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["duration"], 900);
    assert_eq!(sessions[0]["isCountingUp"], false);
    assert_eq!(sessions[0]["date"], DAY);
}

#[test]
fn test_sessions_delete() {
    let dir = tempfile::tempdir().unwrap();
    let keep = Session::new(DAY, 900, false);
    let gone = Session::new(DAY, 300, false);
    seed(dir.path(), &[keep.clone(), gone.clone()]);

    let (out, _, code) = run_cli(dir.path(), &["sessions", "delete", &gone.id, "--date", DAY]);
    assert_eq!(code, 0);
    assert!(out.contains("Session deleted"));

    let (out, _, code) = run_cli(dir.path(), &["sessions", "delete", "no-such-id", "--date", DAY]);
    assert_eq!(code, 0);
    assert!(out.contains("Session not found"));

    let (out, _, _) = run_cli(dir.path(), &["sessions", "list", "--date", DAY, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["id"], keep.id.as_str());
}

#[test]
fn test_invalid_date_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, err, code) = run_cli(dir.path(), &["sessions", "count", "--date", "14/10/2026"]);
    assert_eq!(code, 1);
    assert!(err.contains("invalid date"));
}

#[test]
fn test_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();

    let (out, _, code) = run_cli(dir.path(), &["config", "get", "storage.sessions_key"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "pomodoroSessions");

    let (out, _, code) = run_cli(dir.path(), &["config", "set", "breaks.auto_start", "true"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "ok");

    let (out, _, _) = run_cli(dir.path(), &["config", "get", "breaks.auto_start"]);
    assert_eq!(out.trim(), "true");

    let (_, err, code) = run_cli(dir.path(), &["config", "get", "breaks.nope"]);
    assert_eq!(code, 1);
    assert!(err.contains("unknown config key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (out, _, _) = run_cli(dir.path(), &["config", "get", "breaks.auto_start"]);
    assert_eq!(out.trim(), "false");
}

#[test]
fn test_interactive_finish_records_session() {
    let dir = tempfile::tempdir().unwrap();
    let (out, code) = run_interactive(dir.path(), "s\nf\nl\nq\n");
    assert_eq!(code, 0);
    assert!(out.contains("Focus started"));
    assert!(out.contains("Session 1:"));

    let (out, _, _) = run_cli(dir.path(), &["sessions", "count"]);
    assert_eq!(out.trim(), "1");
}

#[test]
fn test_interactive_eof_quits() {
    let dir = tempfile::tempdir().unwrap();
    let (out, code) = run_interactive(dir.path(), "l\n");
    assert_eq!(code, 0);
    assert!(out.contains("No sessions today"));
}

#[test]
fn test_unreadable_config_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let original = b"[breaks]\nauto_start = true\n# note: \xff\n".to_vec();
    std::fs::write(&path, &original).unwrap();

    let (_, err, code) = run_cli(dir.path(), &["config", "get", "breaks.auto_start"]);
    assert_eq!(code, 1);
    assert!(err.contains("Failed to load configuration"));
    assert_eq!(std::fs::read(&path).unwrap(), original);
}
