//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, Transport};
use crate::core::{UpliftError, UpliftResult};
use crate::release::ReleaseSource;
use crate::update::ArchiveFormat;
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use uplift::di::mocks::MockConfigProvider;
/// use uplift::di::ConfigProvider;
///
/// let mut config = MockConfigProvider::default();
/// config.include_prereleases = true;
///
/// assert_eq!(config.owner(), "octo");
/// assert!(config.include_prereleases());
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub api_url: String,
    pub owner: String,
    pub repository: String,
    pub source: ReleaseSource,
    pub archive_format: ArchiveFormat,
    pub include_prereleases: bool,
    pub proxy: Option<String>,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub temp_dir: PathBuf,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: "octo".to_string(),
            repository: "app".to_string(),
            source: ReleaseSource::Releases,
            archive_format: ArchiveFormat::Zip,
            include_prereleases: false,
            proxy: None,
            connect_timeout: Duration::from_secs(5),
            user_agent: "uplift-test".to_string(),
            temp_dir: std::env::temp_dir().join("uplift-test"),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn repository(&self) -> &str {
        &self.repository
    }

    fn release_source(&self) -> ReleaseSource {
        self.source
    }

    fn archive_format(&self) -> ArchiveFormat {
        self.archive_format
    }

    fn include_prereleases(&self) -> bool {
        self.include_prereleases
    }

    fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn temp_dir(&self) -> UpliftResult<PathBuf> {
        Ok(self.temp_dir.clone())
    }
}

/// Mock transport for testing
///
/// Serves registered JSON bodies and archive bytes from memory and records
/// every requested URL. Unknown URLs fail with `RemoteFetch`, like an
/// unreachable host.
///
/// # Example
///
/// ```
/// use uplift::di::mocks::MockTransport;
///
/// let transport = MockTransport::new();
/// transport.add_json("https://api.github.com/repos/octo/app/releases", "[]");
///
/// assert_eq!(transport.request_count("https://api.github.com/repos/octo/app/releases"), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    json: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    downloads: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for JSON requests to `url`, replacing any earlier body
    pub fn add_json(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.json
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    /// Serve `bytes` for downloads of `url`
    pub fn add_download(&self, url: &str, bytes: Vec<u8>) {
        self.downloads
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes);
    }

    /// How many times `url` was requested, JSON and downloads combined
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    /// Every requested URL, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> UpliftResult<Vec<u8>> {
        self.record(url);
        self.json
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| UpliftError::RemoteFetch(format!("No response from {}", url)))
    }

    async fn download_to_file(&self, url: &str, dest: &Path) -> UpliftResult<u64> {
        self.record(url);
        let bytes = self
            .downloads
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| UpliftError::RemoteFetch(format!("Failed to download {}", url)))?;
        if bytes.is_empty() {
            return Err(UpliftError::RemoteFetch(format!(
                "Download of {} returned no data",
                url
            )));
        }

        tokio::fs::write(dest, &bytes).await?;
        Ok(bytes.len() as u64)
    }
}

/// Build an in-memory zipball laid out like the ones GitHub serves
///
/// Every file lands under the single directory `root`.
pub fn build_zipball(root: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.add_directory(format!("{}/", root), FileOptions::default())
        .expect("zip directory entry");
    for (path, content) in files {
        zip.start_file(format!("{}/{}", root, path), FileOptions::default())
            .expect("zip file entry");
        zip.write_all(content.as_bytes()).expect("zip file content");
    }
    zip.finish().expect("finished zip").into_inner()
}

/// Build an in-memory tarball laid out like the ones GitHub serves
///
/// The archive opens with a `pax_global_header` entry carrying a commit id,
/// followed by the `root` directory and its files.
pub fn build_tarball(root: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let mut tar = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let pax = b"52 comment=0123456789abcdef0123456789abcdef01234567\n";
    let mut header = tar::Header::new_ustar();
    header.set_entry_type(tar::EntryType::XGlobalHeader);
    header.set_path("pax_global_header").expect("pax path");
    header.set_size(pax.len() as u64);
    header.set_mode(0o666);
    header.set_cksum();
    tar.append(&header, &pax[..]).expect("pax entry");

    let mut header = tar::Header::new_ustar();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_path(format!("{}/", root)).expect("root path");
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    tar.append(&header, std::io::empty()).expect("root entry");

    for (path, content) in files {
        let mut header = tar::Header::new_ustar();
        header.set_entry_type(tar::EntryType::Regular);
        header
            .set_path(format!("{}/{}", root, path))
            .expect("file path");
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar.append(&header, content.as_bytes()).expect("file entry");
    }

    tar.into_inner()
        .and_then(|gz| gz.finish())
        .expect("finished tarball")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_serves_and_records() {
        let transport = MockTransport::new();
        transport.add_json("https://example.com/list", "[]");

        assert_eq!(transport.get_json("https://example.com/list").await.unwrap(), b"[]");
        assert!(matches!(
            transport.get_json("https://example.com/other").await,
            Err(UpliftError::RemoteFetch(_))
        ));
        assert_eq!(transport.request_count("https://example.com/list"), 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_transport_download() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("v1.0.zip");
        let transport = MockTransport::new();
        transport.add_download("https://example.com/v1.0", vec![1, 2, 3]);
        transport.add_download("https://example.com/empty", Vec::new());

        let written = transport
            .download_to_file("https://example.com/v1.0", &dest)
            .await
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![1, 2, 3]);

        let empty = transport
            .download_to_file("https://example.com/empty", &temp.path().join("empty.zip"))
            .await;
        assert!(matches!(empty, Err(UpliftError::RemoteFetch(_))));
    }
}
