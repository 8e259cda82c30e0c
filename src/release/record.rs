use crate::update::ArchiveFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which remote listing feeds the release catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseSource {
    /// Published releases (`/repos/{owner}/{repo}/releases`)
    #[default]
    Releases,
    /// Plain git tags (`/repos/{owner}/{repo}/tags`), never prereleases
    Tags,
}

impl ReleaseSource {
    /// Last path segment of the listing endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReleaseSource::Releases => "releases",
            ReleaseSource::Tags => "tags",
        }
    }
}

impl fmt::Display for ReleaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// One published release or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecord {
    /// Version identifier (tag name), unique within a catalog
    pub name: String,
    pub is_prerelease: bool,
    pub zipball_url: Option<String>,
    pub tarball_url: Option<String>,
    /// Human title of the release
    pub title: Option<String>,
    /// Release notes in Markdown
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ReleaseRecord {
    /// Create a record with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_prerelease: false,
            zipball_url: None,
            tarball_url: None,
            title: None,
            body: None,
            published_at: None,
        }
    }

    pub fn prerelease(mut self, is_prerelease: bool) -> Self {
        self.is_prerelease = is_prerelease;
        self
    }

    pub fn with_zipball(mut self, url: impl Into<String>) -> Self {
        self.zipball_url = Some(url.into());
        self
    }

    pub fn with_tarball(mut self, url: impl Into<String>) -> Self {
        self.tarball_url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Download URL for the given archive format, if the remote listed one
    pub fn archive_url(&self, format: ArchiveFormat) -> Option<&str> {
        let url = match format {
            ArchiveFormat::Zip => self.zipball_url.as_deref(),
            ArchiveFormat::TarGz => self.tarball_url.as_deref(),
        };
        url.filter(|u| !u.is_empty())
    }
}
