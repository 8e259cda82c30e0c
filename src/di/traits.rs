//! Trait definitions for dependency injection

use crate::core::UpliftResult;
use crate::release::ReleaseSource;
use crate::update::ArchiveFormat;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Base URL of the GitHub API
    fn api_url(&self) -> &str;

    /// Owner (user or organization) of the tracked repository
    fn owner(&self) -> &str;

    /// Name of the tracked repository
    fn repository(&self) -> &str;

    /// Which listing feeds the release catalog
    fn release_source(&self) -> ReleaseSource;

    /// Preferred archive format for downloads
    fn archive_format(&self) -> ArchiveFormat;

    /// Whether prereleases are listed and installable
    fn include_prereleases(&self) -> bool;

    /// Proxy for all outgoing requests (optional)
    fn proxy(&self) -> Option<&str>;

    fn connect_timeout(&self) -> Duration;

    fn user_agent(&self) -> &str;

    /// Directory that receives downloaded archives
    fn temp_dir(&self) -> UpliftResult<PathBuf>;
}

/// Trait for remote access
///
/// Everything the updater needs from the network: the JSON listing and the
/// archive bytes. Any failure is reported as `UpliftError::RemoteFetch`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch a JSON document and return its raw body
    async fn get_json(&self, url: &str) -> UpliftResult<Vec<u8>>;

    /// Stream a download into `dest`, returning the number of bytes written
    async fn download_to_file(&self, url: &str, dest: &Path) -> UpliftResult<u64>;
}
