//! GitHub API type definitions

use crate::core::{UpliftError, UpliftResult};
use crate::release::{ReleaseRecord, ReleaseSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub release information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub tarball_url: Option<String>,
    pub zipball_url: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// GitHub tag information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTag {
    pub name: String,
    pub commit: Option<TagCommit>,
    pub tarball_url: Option<String>,
    pub zipball_url: Option<String>,
}

/// Commit information in a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCommit {
    pub sha: String,
    pub url: Option<String>,
}

impl From<GitHubRelease> for ReleaseRecord {
    fn from(release: GitHubRelease) -> Self {
        ReleaseRecord {
            name: release.tag_name,
            is_prerelease: release.prerelease,
            zipball_url: release.zipball_url,
            tarball_url: release.tarball_url,
            title: release.name.filter(|t| !t.is_empty()),
            body: release.body.filter(|b| !b.is_empty()),
            published_at: release.published_at,
        }
    }
}

impl From<GitHubTag> for ReleaseRecord {
    fn from(tag: GitHubTag) -> Self {
        ReleaseRecord {
            name: tag.name,
            is_prerelease: false,
            zipball_url: tag.zipball_url,
            tarball_url: tag.tarball_url,
            title: None,
            body: None,
            published_at: None,
        }
    }
}

/// Decode a release or tag listing into records, keeping the remote order
///
/// Draft releases are skipped: they have no published tag to download.
pub fn parse_listing(body: &[u8], source: ReleaseSource) -> UpliftResult<Vec<ReleaseRecord>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(UpliftError::RemoteFetch(
            "The releases API returned an empty response".to_string(),
        ));
    }

    let invalid = |e: serde_json::Error| {
        UpliftError::RemoteFetch(format!("Failed to parse {} listing: {}", source, e))
    };

    let records = match source {
        ReleaseSource::Releases => serde_json::from_slice::<Vec<GitHubRelease>>(body)
            .map_err(invalid)?
            .into_iter()
            .filter(|r| !r.draft)
            .map(ReleaseRecord::from)
            .collect(),
        ReleaseSource::Tags => serde_json::from_slice::<Vec<GitHubTag>>(body)
            .map_err(invalid)?
            .into_iter()
            .map(ReleaseRecord::from)
            .collect(),
    };

    Ok(records)
}
