#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! These tests ensure that the CLI binary starts correctly and
//! responds to basic commands without crashing.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn mdtl() -> Command {
    Command::cargo_bin("mdtl").unwrap()
}

/// A command pointed at an isolated, empty config directory.
fn mdtl_isolated(temp_dir: &TempDir) -> Command {
    let mut cmd = mdtl();
    cmd.env("XDG_CONFIG_HOME", temp_dir.path());
    cmd.env_remove("MDTL_API_KEY");
    cmd
}

#[test]
fn test_help_displays_usage() {
    mdtl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Streaming AI translation for markdown documents",
        ))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("configure"));
}

#[test]
fn test_version_displays_version() {
    mdtl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_empty_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    mdtl_isolated(&temp_dir)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input is empty"));
}

#[test]
fn test_missing_api_key_is_actionable() {
    let temp_dir = TempDir::new().unwrap();
    // stdin carries the document, so no interactive prompt is possible
    mdtl_isolated(&temp_dir)
        .write_stdin("# Hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is required"))
        .stderr(predicate::str::contains("MDTL_API_KEY"));
}

#[test]
fn test_configure_show_prints_defaults() {
    let temp_dir = TempDir::new().unwrap();
    mdtl_isolated(&temp_dir)
        .args(["configure", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.openai.com/v1"))
        .stdout(predicate::str::contains("gpt-4"))
        .stdout(predicate::str::contains("zh-CN"));
}

#[test]
fn test_configure_help() {
    mdtl()
        .args(["configure", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--show"));
}
