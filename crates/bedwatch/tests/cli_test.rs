//! Integration tests for the `bedwatch` CLI binary.
//!
//! Argument parsing, help output, shell completions, local validation and
//! error exit codes, plus one run against a mocked backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `bedwatch` binary with env isolation.
///
/// Clears all `BEDWATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn bedwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bedwatch");
    cmd.env("HOME", "/tmp/bedwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/bedwatch-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("BEDWATCH_PROFILE")
        .env_remove("BEDWATCH_API_URL")
        .env_remove("BEDWATCH_TOKEN")
        .env_remove("BEDWATCH_OUTPUT")
        .env_remove("BEDWATCH_INSECURE")
        .env_remove("BEDWATCH_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = bedwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    bedwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("bed occupancy")
            .and(predicate::str::contains("hospitals"))
            .and(predicate::str::contains("dashboard"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    bedwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bedwatch"));
}

#[test]
fn test_invalid_subcommand() {
    bedwatch_cmd()
        .arg("nonexistent")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_hospitals_help_lists_actions() {
    bedwatch_cmd()
        .args(["hospitals", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("create")
                .and(predicate::str::contains("stats"))
                .and(predicate::str::contains("sync")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    bedwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    bedwatch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bedwatch"));
}

#[test]
fn test_completions_fish() {
    bedwatch_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config (no backend needed) ──────────────────────────────────────

#[test]
fn test_config_path_prints_toml_location() {
    bedwatch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file() {
    bedwatch_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_show_json() {
    let output = bedwatch_cmd()
        .args(["-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["defaults"]["timeout"], 30);
}

// ── Local validation ────────────────────────────────────────────────

#[test]
fn test_create_rejects_icu_above_total_without_network() {
    let output = bedwatch_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9/api",
            "--token",
            "t",
            "hospitals",
            "create",
            "--name",
            "City General",
            "--location",
            "Pune",
            "--total-beds",
            "10",
            "--icu-beds",
            "20",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("ICU beds (20) cannot exceed total beds (10)"),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_create_rejects_blank_name() {
    let output = bedwatch_cmd()
        .args([
            "--token",
            "t",
            "hospitals",
            "create",
            "--name",
            "   ",
            "--location",
            "Pune",
            "--total-beds",
            "10",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_api_url_is_usage_error() {
    bedwatch_cmd()
        .args(["--api-url", "not a url", "hospitals", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let output = bedwatch_cmd()
        .args(["--profile", "missing", "hospitals", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("missing"));
}

// ── Backend errors ──────────────────────────────────────────────────

#[test]
fn test_connection_refused_exit_code() {
    bedwatch_cmd()
        .args([
            "--api-url",
            "http://127.0.0.1:9/api",
            "--token",
            "t",
            "--timeout",
            "5",
            "hospitals",
            "list",
        ])
        .assert()
        .failure()
        .code(7);
}

// ── Mocked backend ──────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_hospitals_list_json_against_mock_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/hospitals"))
        .and(header("Authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "hospital_name": "Apollo Hospitals",
                "location": "Mumbai, Maharashtra",
                "total_beds": 250,
                "icu_beds": 30
            },
            {
                "id": 2,
                "hospital_name": "Fortis Healthcare",
                "location": "Delhi, NCR",
                "total_beds": 180,
                "icu_beds": 25
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api_url = format!("{}/api", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        bedwatch_cmd()
            .args([
                "--api-url",
                api_url.as_str(),
                "--token",
                "t",
                "-o",
                "json",
                "hospitals",
                "list",
                "--filter",
                "delhi",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "command failed:\n{}",
        combined_output(&output)
    );
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["hospital_name"], "Fortis Healthcare");
}
