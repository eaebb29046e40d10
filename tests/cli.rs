//! Integration tests for top-level CLI behavior.

use std::process::Command;

use serde_json::json;
use ticketlink::cassette::recorder::CassetteRecorder;

fn run_ticketlink(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_ticketlink");
    Command::new(bin)
        .args(args)
        .env_remove("GITHUB_ACTIONS")
        .env_remove("TICKETLINK_RECORD")
        .output()
        .expect("failed to run ticketlink binary")
}

const INPUTS: [&str; 10] = [
    "--github-token",
    "gh",
    "--atlassian-token",
    "me@example.com:token",
    "--atlassian-domain",
    "example.atlassian.net",
    "--title-regex",
    r"\((?<ticket>[A-Z]+-\d+)\)",
    "--branch-name-regex",
    r"(?<ticket>[A-Z]+-\d+)",
];

#[test]
fn extract_prints_one_ticket_per_line() {
    let output = run_ticketlink(&[
        "extract",
        "--regex",
        r"^\[(?<ticket>[^\]]+)\]",
        "--delimiter",
        ",",
        "[abc-1, ABC-2] Split work",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout, "ABC-1\nABC-2\n");
}

#[test]
fn extract_without_match_fails() {
    let output = run_ticketlink(&["extract", "--regex", r"(?<ticket>[A-Z]+-\d+)", "no ticket"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("does not match"));
}

#[test]
fn check_without_inputs_names_missing_input() {
    let output = run_ticketlink(&["check"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Input required and not supplied"));
}

#[test]
fn check_replays_failed_run_and_emits_error_annotation() {
    let dir = std::env::temp_dir().join("ticketlink_cli_replay");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("run.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, "cli", "abc");
    recorder.record(
        "host",
        "event",
        json!({}),
        json!({"Ok": {"title": "Fix (ABC-1)", "body": "", "branch": "ABC-2"}}),
    );
    recorder.record("host", "set_output", json!({}), json!({"Ok": null}));
    recorder.record("host", "fail", json!({}), json!({"Ok": null}));
    recorder.finish().unwrap();

    let mut args: Vec<&str> = vec!["check"];
    args.extend(INPUTS);
    let replay = path.to_string_lossy().to_string();
    args.extend(["--replay", replay.as_str()]);
    let output = run_ticketlink(&args);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Branch tickets differ from title tickets"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_ticketlink(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
