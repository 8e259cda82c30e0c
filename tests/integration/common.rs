//! Common utilities for integration tests

use std::path::Path;
use std::process::{Command, Output};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn uplift_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uplift"));
    cmd.env_remove("GITHUB_TOKEN");
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Command pointed at `server` for octo/app, with a config file that does not exist
pub fn uplift_against(server: &MockServer, scratch: &Path) -> Command {
    let mut cmd = uplift_command();
    cmd.arg("--server")
        .arg(server.uri())
        .arg("--repo")
        .arg("octo/app")
        .arg("--config")
        .arg(scratch.join("no-config.yaml"));
    cmd
}

/// Run a command off the async runtime so the mock server keeps answering
pub async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap()
}

/// Serve a release listing for octo/app
pub async fn mount_releases(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

/// A release entry whose archives are served by `server`
pub fn release(server: &MockServer, tag: &str, prerelease: bool) -> serde_json::Value {
    serde_json::json!({
        "tag_name": tag,
        "name": format!("Release {}", tag),
        "prerelease": prerelease,
        "body": format!("Changes in {}", tag),
        "published_at": "2024-03-01T10:00:00Z",
        "zipball_url": format!("{}/repos/octo/app/zipball/{}", server.uri(), tag),
        "tarball_url": format!("{}/repos/octo/app/tarball/{}", server.uri(), tag),
    })
}
