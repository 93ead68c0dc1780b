//! Integration tests for the `connect-mesh` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling without talking to the cloud.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the binary with env isolation.
///
/// Clears all `CONNECT_MESH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn mesh_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("connect-mesh");
    cmd.env("HOME", "/tmp/connect-mesh-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/connect-mesh-test-nonexistent")
        .env_remove("CONNECT_MESH_PROFILE")
        .env_remove("CONNECT_MESH_TOKEN")
        .env_remove("CONNECT_MESH_NETWORK")
        .env_remove("CONNECT_MESH_OUTPUT")
        .env_remove("CONNECT_MESH_TIMEOUT")
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
    let output = mesh_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mesh_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Connect Mesh")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("networks"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    mesh_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("connect-mesh"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    mesh_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    mesh_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = mesh_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_not_found() {
    mesh_cmd()
        .args(["--profile", "nope", "devices", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    mesh_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_profiles_empty() {
    mesh_cmd()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_invalid_output_format() {
    let output = mesh_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_temperature_requires_a_unit() {
    let output = mesh_cmd()
        .args(["--token", "t", "temperature", "dev-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--kelvin"), "Expected unit hint:\n{text}");
}

#[test]
fn test_temperature_units_conflict() {
    mesh_cmd()
        .args([
            "--token",
            "t",
            "temperature",
            "dev-1",
            "--kelvin",
            "3000",
            "--mireds",
            "300",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_brightness_out_of_range_fails_before_any_request() {
    // The range check runs before the device is fetched, so no network
    // access happens and the error is a usage error.
    mesh_cmd()
        .args(["--token", "t", "brightness", "dev-1", "300"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("brightness"));
}

#[test]
fn test_watch_without_network_is_usage_error() {
    mesh_cmd()
        .args(["--token", "t", "watch"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("network"));
}

#[test]
fn test_watch_scan_interval_out_of_range() {
    mesh_cmd()
        .args(["--token", "t", "--network", "net-1", "watch", "--scan-interval", "5"])
        .assert()
        .code(2);
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_devices_subcommands_exist() {
    mesh_cmd()
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("status")),
        );
}

#[test]
fn test_groups_subcommands_exist() {
    mesh_cmd()
        .args(["groups", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("power"))
                .and(predicate::str::contains("brightness")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    mesh_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-token")),
        );
}
