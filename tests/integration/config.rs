//! Tests for configuration handling in the CLI

use super::common::uplift_command;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_repository_is_reported() {
    let temp = TempDir::new().unwrap();

    let output = uplift_command()
        .arg("--config")
        .arg(temp.path().join("config.yaml"))
        .arg("latest")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No repository configured"));
    assert!(stderr.contains("help:"));
}

#[test]
fn test_invalid_repo_flag() {
    let temp = TempDir::new().unwrap();

    let output = uplift_command()
        .arg("--config")
        .arg(temp.path().join("config.yaml"))
        .args(["--repo", "just-a-name", "latest"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("owner/repo"));
}

#[test]
fn test_unparsable_config_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.yaml");
    fs::write(&config, "owner: [broken").unwrap();

    let output = uplift_command()
        .arg("--config")
        .arg(&config)
        .arg("latest")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse"));
}

#[test]
fn test_invalid_format_flag() {
    let output = uplift_command()
        .args(["install", "--root", ".", "--format", "rar", "--yes"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rar"));
}
