//! Tests for `uplift compare`

use super::common::uplift_command;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_compare_prerelease_before_release() {
    let output = uplift_command()
        .args(["compare", "v0.1-alpha", "v0.1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "v0.1-alpha < v0.1");
}

#[test]
fn test_compare_needs_no_repository() {
    Command::cargo_bin("uplift")
        .unwrap()
        .env_remove("GITHUB_TOKEN")
        .args(["compare", "v1.10", "v1.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1.10 > v1.9"));
}

#[test]
fn test_compare_aliases_are_equal() {
    Command::cargo_bin("uplift")
        .unwrap()
        .args(["compare", "v0.1-alpha", "v0.1-a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("="));
}

#[test]
fn test_compare_requires_two_versions() {
    Command::cargo_bin("uplift")
        .unwrap()
        .args(["compare", "v1.0"])
        .assert()
        .failure();
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("uplift")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("releases"))
        .stdout(predicate::str::contains("compare"));
}
