//! Command-line tests for configuration handling
//!
//! These run the binary without a backend, so they only exercise paths that
//! fail or finish before any network call.
use assert_cmd::Command;
use predicates::prelude::*;
mod common;

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("saarthi"));
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("vent"));
}

#[test]
fn test_invalid_default_persona_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("chat:\n  default_persona: therapist\n");

    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.env_remove("SAARTHI_DEFAULT_PERSONA")
        .arg("--config")
        .arg(config_path)
        .arg("sessions")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid chat.default_persona"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("server:\n  timeout_seconds: 0\n");

    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.env_remove("SAARTHI_TIMEOUT_SECONDS")
        .arg("--config")
        .arg(config_path)
        .arg("sessions")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_non_http_api_url_is_rejected() {
    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.arg("--config")
        .arg("nonexistent.yaml")
        .arg("--api-url")
        .arg("ftp://example.com")
        .arg("sessions")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}

#[test]
fn test_deleting_memory_session_is_refused() {
    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.arg("--config")
        .arg("nonexistent.yaml")
        .arg("--api-url")
        .arg("http://127.0.0.1:1")
        .arg("sessions")
        .arg("delete")
        .arg("special-chat-1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}

#[test]
fn test_malformed_config_file_fails() {
    let (_temp_dir, config_path) = common::temp_config_file("server: [not, a, map");

    let mut cmd = Command::cargo_bin("saarthi").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .arg("sessions")
        .arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
