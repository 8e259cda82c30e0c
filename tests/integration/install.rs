//! Tests for `uplift install`

use super::common::{mount_releases, release, run, uplift_against, uplift_command};
use std::fs;
use tempfile::TempDir;
use uplift::di::mocks::{build_tarball, build_zipball};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_archive(server: &MockServer, archive_path: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(archive_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_install_latest_zipball() {
    let server = MockServer::start().await;
    let body = serde_json::json!([release(&server, "v1.1", false), release(&server, "v1.0", false)]);
    mount_releases(&server, body).await;
    mount_archive(
        &server,
        "/repos/octo/app/zipball/v1.1",
        build_zipball(
            "octo-app-9f8e7d",
            &[("index.php", "<?php echo 'v1.1';"), ("assets/app.css", "body{}")],
        ),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");
    let downloads = temp.path().join("downloads");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.php"), "<?php echo 'v1.0';").unwrap();
    fs::write(root.join("settings.php"), "local").unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("install")
        .arg("--root")
        .arg(&root)
        .arg("--temp")
        .arg(&downloads)
        .arg("--yes");
    let output = run(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Installed v1.1"));
    assert_eq!(
        fs::read_to_string(root.join("index.php")).unwrap(),
        "<?php echo 'v1.1';"
    );
    assert_eq!(fs::read_to_string(root.join("assets/app.css")).unwrap(), "body{}");
    assert_eq!(fs::read_to_string(root.join("settings.php")).unwrap(), "local");
    assert!(!downloads.join("v1.1.zip").exists());
    assert!(!downloads.join("octo-app-9f8e7d").exists());
}

#[tokio::test]
async fn test_install_specific_version_as_tarball() {
    let server = MockServer::start().await;
    let body = serde_json::json!([release(&server, "v1.1", false), release(&server, "v1.0", false)]);
    mount_releases(&server, body).await;
    mount_archive(
        &server,
        "/repos/octo/app/tarball/v1.0",
        build_tarball("octo-app-1a1a1a", &[("VERSION", "1.0")]),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("install")
        .args(["--version", "v1.0", "--format", "tar.gz", "--yes"])
        .arg("--root")
        .arg(&root)
        .arg("--temp")
        .arg(temp.path().join("downloads"));
    let output = run(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "1.0");
}

#[tokio::test]
async fn test_install_without_version_takes_first_listed() {
    let server = MockServer::start().await;
    // Listed first but not the highest version
    let body = serde_json::json!([release(&server, "v1.0.1", false), release(&server, "v2.0", false)]);
    mount_releases(&server, body).await;
    mount_archive(
        &server,
        "/repos/octo/app/zipball/v1.0.1",
        build_zipball("octo-app-101", &[("VERSION", "1.0.1")]),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");

    let mut cmd = uplift_against(&server, temp.path());
    cmd.args(["install", "--yes"])
        .arg("--root")
        .arg(&root)
        .arg("--temp")
        .arg(temp.path().join("downloads"));
    let output = run(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Installed v1.0.1"));
    assert_eq!(fs::read_to_string(root.join("VERSION")).unwrap(), "1.0.1");
}

#[tokio::test]
async fn test_install_uses_temp_dir_from_config() {
    let server = MockServer::start().await;
    mount_releases(&server, serde_json::json!([release(&server, "v1.1", false)])).await;
    mount_archive(
        &server,
        "/repos/octo/app/zipball/v1.1",
        build_zipball("octo-app-9f8e7d", &[("index.php", "new")]),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");
    let downloads = temp.path().join("configured-downloads");
    let config_path = temp.path().join("config.yaml");
    fs::write(
        &config_path,
        format!(
            "api_url: {}\nowner: octo\nrepository: app\ntemp_dir: {}\n",
            server.uri(),
            downloads.display()
        ),
    )
    .unwrap();

    let mut cmd = uplift_command();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["install", "--yes"])
        .arg("--root")
        .arg(&root);
    let output = run(cmd).await;

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(root.join("index.php")).unwrap(), "new");
    // The download directory was created where the config points
    assert!(downloads.is_dir());
    assert!(!downloads.join("v1.1.zip").exists());
}

#[tokio::test]
async fn test_install_corrupt_archive_fails() {
    let server = MockServer::start().await;
    mount_releases(&server, serde_json::json!([release(&server, "v1.1", false)])).await;
    mount_archive(
        &server,
        "/repos/octo/app/zipball/v1.1",
        b"this is not a zip file".to_vec(),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let root = temp.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.php"), "untouched").unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("install")
        .arg("--root")
        .arg(&root)
        .arg("--temp")
        .arg(temp.path().join("downloads"))
        .arg("--yes");
    let output = run(cmd).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("download it again"));
    assert_eq!(fs::read_to_string(root.join("index.php")).unwrap(), "untouched");
}

#[tokio::test]
async fn test_install_unknown_version_fails() {
    let server = MockServer::start().await;
    mount_releases(&server, serde_json::json!([release(&server, "v1.1", false)])).await;

    let temp = TempDir::new().unwrap();

    let mut cmd = uplift_against(&server, temp.path());
    cmd.arg("install")
        .args(["--version", "v3.0", "--yes"])
        .arg("--root")
        .arg(temp.path().join("site"))
        .arg("--temp")
        .arg(temp.path().join("downloads"));
    let output = run(cmd).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("v3.0"));
}
