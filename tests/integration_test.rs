//! Integration tests for thread-guard CLI.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Write `plugin_table` as the `[pec]` section of a fresh config file.
fn config_with(plugin_table: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let content = format!("[pec]\n{}\n", plugin_table);
    fs::write(dir.path().join("config.toml"), content).expect("Failed to write config");
    dir
}

/// Helper to run thread-guard with JSON input and return (stdout, stderr, exit_code).
fn run_hook(config_dir: &Path, hook: &str, json_input: &str) -> (String, String, i32) {
    run_hook_bytes(config_dir, hook, json_input.as_bytes())
}

fn run_hook_bytes(config_dir: &Path, hook: &str, input: &[u8]) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_thread-guard"))
        .arg("--config")
        .arg(config_dir.join("config.toml"))
        .arg("run")
        .arg("--hook")
        .arg(hook)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn thread-guard");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).unwrap();
    }

    let output = child.wait_with_output().expect("Failed to read output");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn run_thread_hook(config_dir: &Path, json_input: &str) -> (String, String, i32) {
    run_hook(config_dir, "before-new-thread", json_input)
}

fn run_command(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_thread-guard"))
        .arg("--config")
        .arg(config_dir.join("config.toml"))
        .args(args)
        .output()
        .expect("Failed to run thread-guard");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_cancel_on_configured_prefix() {
    let dir = config_with(r#"ignoredStartsWith = ["!mute", "!warn"]"#);
    let (stdout, _stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"!warn user"}}"#);

    assert_eq!(exit_code, 2, "Prefixed message should be cancelled");
    assert!(
        stdout.contains(r#""decision":"cancel""#),
        "Output should indicate cancel: {}",
        stdout
    );
    assert!(stdout.contains("!warn"), "Reason should name the prefix");
}

#[test]
fn test_allow_unprefixed_message() {
    let dir = config_with(r#"ignoredStartsWith = ["!mute"]"#);
    let (stdout, _stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"hello there"}}"#);

    assert_eq!(exit_code, 0, "Plain message should be allowed");
    assert!(
        stdout.contains(r#""decision":"allow""#),
        "Output should indicate allow: {}",
        stdout
    );
}

#[test]
fn test_case_insensitive_by_default() {
    let dir = config_with(r#"ignoredStartsWith = ["STOP"]"#);
    let (_stdout, _stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"stop now"}}"#);
    assert_eq!(exit_code, 2);
}

#[test]
fn test_case_sensitive_when_configured() {
    let dir = config_with("ignoredStartsWith = [\"STOP\"]\ncaseSensitive = true");
    let (_stdout, _stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"stop now"}}"#);
    assert_eq!(exit_code, 0);
}

#[test]
fn test_whitespace_message_allowed() {
    let dir = config_with(r#"ignoredStartsWith = [" ", ""]"#);
    let (stdout, _stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"   "}}"#);

    assert_eq!(exit_code, 0, "Blank message must never be filtered");
    assert!(stdout.contains(r#""decision":"allow""#));
}

#[test]
fn test_event_without_message_allowed() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (_stdout, _stderr, exit_code) = run_thread_hook(dir.path(), r#"{"user":{"id":"1"}}"#);
    assert_eq!(exit_code, 0);
}

#[test]
fn test_disengaged_plugin_allows_and_reports_once() {
    let dir = config_with("");
    let (stdout, stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"!anything"}}"#);

    assert_eq!(exit_code, 0, "Disengaged plugin should allow");
    assert!(stdout.contains(r#""decision":"allow""#));
    assert_eq!(
        stderr.matches("disengaged").count(),
        1,
        "Expected exactly one disengage notice: {}",
        stderr
    );
}

#[test]
fn test_message_hook_not_registered_by_default() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (_stdout, _stderr, exit_code) = run_hook(
        dir.path(),
        "before-new-message-received",
        r#"{"message":{"content":"!x"}}"#,
    );
    assert_eq!(exit_code, 0, "Message hook is off unless enabled");
}

#[test]
fn test_message_hook_enabled_with_truthy_literal() {
    let dir = config_with(
        "ignoredStartsWith = [\"!\"]\nbeforeNewMessageReceivedEnabled = \"on\"",
    );
    let (_stdout, _stderr, exit_code) = run_hook(
        dir.path(),
        "before-new-message-received",
        r#"{"message":{"content":"!x"}}"#,
    );
    assert_eq!(exit_code, 2);
}

#[test]
fn test_member_of_one_server_allowed() {
    let dir = config_with(r#"serverIds = ["A", "B"]"#);
    let input = r#"{"user":{"id":"42"},"message":{"content":"hi"},"servers":{"A":[],"B":["42"]}}"#;
    let (_stdout, _stderr, exit_code) = run_thread_hook(dir.path(), input);
    assert_eq!(exit_code, 0, "Membership in any server is enough");
}

#[test]
fn test_non_member_cancelled() {
    let dir = config_with(r#"serverIds = ["A", "B"]"#);
    let input = r#"{"user":{"id":"42"},"message":{"content":"hi"},"servers":{"A":[],"B":["7"]}}"#;
    let (stdout, stderr, exit_code) = run_thread_hook(dir.path(), input);

    assert_eq!(exit_code, 2, "Non-member should be cancelled");
    assert!(stdout.contains("not a member"), "stdout: {}", stdout);
    assert!(stderr.contains("42"), "Absence notice should name the user");
}

#[test]
fn test_unknown_server_counts_as_absent() {
    let dir = config_with(r#"serverIds = ["gone"]"#);
    let input = r#"{"user":{"id":"42"},"message":{"content":"hi"},"servers":{}}"#;
    let (_stdout, stderr, exit_code) = run_thread_hook(dir.path(), input);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("unknown server gone"), "stderr: {}", stderr);
}

#[test]
fn test_debug_traces_each_tested_prefix() {
    let dir = config_with("ignoredStartsWith = [\"!mute\", \"!warn\", \"!ban\"]\ndebug = true");
    let (_stdout, stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"!warn user"}}"#);

    assert_eq!(exit_code, 2);
    let miss = stderr.find("Not preventing event for prefix \"!mute\"");
    let hit = stderr.find("Preventing event for prefix \"!warn\"");
    assert!(miss.is_some() && hit.is_some(), "stderr: {}", stderr);
    assert!(miss < hit, "Trace must follow configuration order");
    assert!(!stderr.contains("\"!ban\""), "Scanning stops at first match");
}

#[test]
fn test_unknown_setting_reported() {
    let dir = config_with("ignoredStartsWith = [\"!\"]\nfooBar = 1");
    let (_stdout, stderr, exit_code) =
        run_thread_hook(dir.path(), r#"{"message":{"content":"hello"}}"#);

    assert_eq!(exit_code, 0);
    assert_eq!(
        stderr.matches("Setting fooBar is not a valid setting").count(),
        1
    );
}

#[test]
fn test_invalid_input_fails_closed() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (stdout, _stderr, exit_code) = run_thread_hook(dir.path(), "not json");

    assert_eq!(exit_code, 2, "Unparseable input should cancel");
    assert!(stdout.contains("fail-closed"));
}

#[test]
fn test_empty_input_fails_closed() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (stdout, _stderr, exit_code) = run_thread_hook(dir.path(), "");

    assert_eq!(exit_code, 2);
    assert!(stdout.contains(r#""decision":"cancel""#));
}

#[test]
fn test_non_utf8_input_fails_closed() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (stdout, _stderr, exit_code) = run_hook_bytes(
        dir.path(),
        "before-new-thread",
        b"{\"message\":{\"content\":\"hi \xff\"}}",
    );

    assert_eq!(exit_code, 2, "Undecodable input should cancel");
    assert!(stdout.contains(r#""decision":"cancel""#), "stdout: {}", stdout);
    assert!(stdout.contains("fail-closed"));
}

#[test]
fn test_check_reports_engagement() {
    let dir = config_with(r#"ignoredStartsWith = ["!"]"#);
    let (_stdout, stderr, exit_code) = run_command(dir.path(), &["check"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("Plugin engaged on: beforeNewThread"), "stderr: {}", stderr);
}

#[test]
fn test_check_reports_invalid_boolean() {
    let dir = config_with("ignoredStartsWith = [\"!\"]\nbeforeNewThreadEnabled = \"maybe\"");
    let (_stdout, stderr, exit_code) = run_command(dir.path(), &["check"]);

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("Value maybe is not a valid truthy or falsy value"));
    // Default survives the bad literal
    assert!(stderr.contains("Plugin engaged on: beforeNewThread"));
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("generated.toml");
    let (_stdout, _stderr, exit_code) = run_command(
        dir.path(),
        &["init", "--path", target.to_str().unwrap()],
    );

    assert_eq!(exit_code, 0);
    let content = fs::read_to_string(&target).unwrap();
    assert!(content.contains("[pec]"));
    assert!(content.contains("ignoredStartsWith"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _stderr, exit_code) = run_command(dir.path(), &["version"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("thread-guard "));
}
