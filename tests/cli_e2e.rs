//! End-to-end tests for the proxyview binary.
//!
//! Only network-free paths are exercised here: argument surface, fragment
//! navigation, the navigate shortcut, and synchronous input validation.
//! Negotiation flows are covered by `resolve_integration.rs`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with config loading isolated from the host environment.
fn proxyview() -> (Command, TempDir) {
    let config_home = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("proxyview").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    (cmd, config_home)
}

#[test]
fn test_help_describes_tool() {
    let (mut cmd, _guard) = proxyview();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve a URL"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn test_version_prints_crate_version() {
    let (mut cmd, _guard) = proxyview();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_url_fails() {
    let (mut cmd, _guard) = proxyview();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_fragment_input_emits_href_without_network() {
    let (mut cmd, _guard) = proxyview();
    cmd.args(["#section-2", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"href""#))
        .stdout(predicate::str::contains("#section-2"));
}

#[test]
fn test_navigate_shortcut_upgrades_and_emits_href() {
    let (mut cmd, _guard) = proxyview();
    cmd.args(["github.com/a", "--navigate", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind":"href""#))
        .stdout(predicate::str::contains("https://github.com/a"));
}

#[test]
fn test_malformed_input_reports_error_delivery() {
    let (mut cmd, _guard) = proxyview();
    cmd.args(["http://", "--quiet"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""kind":"error""#))
        .stdout(predicate::str::contains("not a valid URL"));
}

#[test]
fn test_invalid_type_value_is_rejected() {
    let (mut cmd, _guard) = proxyview();
    cmd.args(["example.com", "--type", "blob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_config_file_with_bad_key_fails_startup() {
    let config_home = TempDir::new().unwrap();
    let dir = config_home.path().join("proxyview");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "mystery = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("proxyview").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.args(["#top"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
