//! Tests for `uplift releases`, `latest`, `check` and `show`

use super::common::{mount_releases, release, run, uplift_against};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_releases() -> MockServer {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        release(&server, "v1.1", false),
        release(&server, "v1.0", false),
        release(&server, "v2.0-beta", true),
    ]);
    mount_releases(&server, body).await;
    server
}

#[tokio::test]
async fn test_releases_hides_prereleases() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("releases");
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("v1.1  2024-03-01  Release v1.1"));
    assert!(stdout.contains("v1.0"));
    assert!(!stdout.contains("v2.0-beta"));
}

#[tokio::test]
async fn test_releases_json_with_prereleases() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["--prereleases", "releases", "--json"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["v1.1", "v1.0", "v2.0-beta"]);
    assert_eq!(parsed[2]["is_prerelease"], serde_json::json!(true));
}

#[tokio::test]
async fn test_latest() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("latest");
    let output = run(cmd).await;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "v1.1");
}

#[tokio::test]
async fn test_check_up_to_date_and_outdated() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["check", "v1.1"]);
    let output = run(cmd).await;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("v1.1 is up to date"));

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["check", "v1.0"]);
    let output = run(cmd).await;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Update available: v1.0 → v1.1"));
    assert!(stdout.contains("Next release: v1.1 (Release v1.1)"));
}

#[tokio::test]
async fn test_show_release() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["show", "v1.0"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Release v1.0"));
    assert!(stdout.contains("/repos/octo/app/zipball/v1.0"));
    assert!(stdout.contains("Changes in v1.0"));
}

#[tokio::test]
async fn test_show_unknown_release() {
    let server = server_with_releases().await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["show", "v9.9"]);
    let output = run(cmd).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("v9.9"));
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("latest");
    let output = run(cmd).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("500"));
    assert!(stderr.contains("help:"));
}
