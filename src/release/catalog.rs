//! In-memory catalog of the remote releases

use crate::core::version::{compare_versions, VersionKey};
use crate::core::{UpliftError, UpliftResult};
use crate::di::Transport;
use crate::github::types::parse_listing;
use crate::release::{ReleaseRecord, ReleaseSource};
use crate::update::ArchiveFormat;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Releases of one repository, in the order the remote listed them
///
/// The listing is fetched on first use and kept for the lifetime of the catalog.
/// Only [`ReleaseCatalog::fetch`] replaces it; the read accessors fetch only when
/// nothing usable is cached.
///
/// The remote is expected to list newest first. "Latest" therefore means the first
/// entry, not the highest version by [`compare_versions`].
pub struct ReleaseCatalog {
    transport: Arc<dyn Transport>,
    url: String,
    source: ReleaseSource,
    include_prereleases: bool,
    cache: Option<CachedListing>,
}

struct CachedListing {
    include_prereleases: bool,
    records: Vec<ReleaseRecord>,
}

impl ReleaseCatalog {
    /// Create an empty catalog reading the listing at `url`
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>, source: ReleaseSource) -> Self {
        Self {
            transport,
            url: url.into(),
            source,
            include_prereleases: false,
            cache: None,
        }
    }

    /// Keep prereleases when the listing is next fetched
    pub fn with_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    /// Change the prerelease filter used by lazy fetches
    pub fn set_include_prereleases(&mut self, include: bool) {
        self.include_prereleases = include;
    }

    pub fn includes_prereleases(&self) -> bool {
        self.include_prereleases
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> ReleaseSource {
        self.source
    }

    /// Whether a listing is currently cached
    pub fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.cached().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cached().is_empty()
    }

    /// Fetch the listing from the remote and replace the cache
    ///
    /// Without `force_refresh`, a cache built with the same prerelease filter is
    /// returned as is. Prereleases are dropped unless `include_prereleases` is set.
    pub async fn fetch(
        &mut self,
        force_refresh: bool,
        include_prereleases: bool,
    ) -> UpliftResult<&[ReleaseRecord]> {
        self.include_prereleases = include_prereleases;

        let fresh = matches!(
            &self.cache,
            Some(cached) if cached.include_prereleases == include_prereleases
        );
        if force_refresh || !fresh {
            debug!(url = %self.url, "Fetching release listing");
            let body = self.transport.get_json(&self.url).await?;
            let listed = parse_listing(&body, self.source)?;
            let total = listed.len();

            let mut records: Vec<ReleaseRecord> = Vec::with_capacity(total);
            for record in listed {
                if record.is_prerelease && !include_prereleases {
                    continue;
                }
                insert_record(&mut records, record);
            }

            info!(
                source = %self.source,
                listed = total,
                kept = records.len(),
                "Release catalog loaded"
            );
            self.cache = Some(CachedListing {
                include_prereleases,
                records,
            });
        }

        Ok(self.cached())
    }

    /// All records, fetching if the cache is empty
    ///
    /// A cache built under a different prerelease filter than the current one
    /// counts as empty.
    pub async fn records(&mut self) -> UpliftResult<&[ReleaseRecord]> {
        let include = self.include_prereleases;
        let stale = match &self.cache {
            Some(cached) => cached.include_prereleases != include,
            None => true,
        };
        if stale {
            self.fetch(false, include).await?;
        }
        Ok(self.cached())
    }

    /// The first record in remote order
    pub async fn latest(&mut self) -> UpliftResult<Option<&ReleaseRecord>> {
        Ok(self.records().await?.first())
    }

    /// The first record in remote order whose name is newer than `after`
    ///
    /// `after` does not have to exist in the catalog. When the remote order is not
    /// newest-first, this is not necessarily the immediate successor.
    pub async fn next(&mut self, after: &str) -> UpliftResult<Option<&ReleaseRecord>> {
        Ok(self
            .records()
            .await?
            .iter()
            .find(|r| compare_versions(after, &r.name) == Ordering::Less))
    }

    /// The record with exactly this name
    pub async fn lookup(&mut self, name: &str) -> UpliftResult<Option<&ReleaseRecord>> {
        Ok(self.records().await?.iter().find(|r| r.name == name))
    }

    /// Whether `version` is at least as new as the latest record
    ///
    /// An empty catalog has nothing newer to offer, so any version is up to date.
    pub async fn is_up_to_date(&mut self, version: &str) -> UpliftResult<bool> {
        Ok(match self.latest().await? {
            Some(latest) => compare_versions(version, &latest.name) != Ordering::Less,
            None => true,
        })
    }

    /// The record with the highest version, regardless of remote order
    pub async fn highest(&mut self) -> UpliftResult<Option<&ReleaseRecord>> {
        Ok(self
            .records()
            .await?
            .iter()
            .max_by(|a, b| VersionKey::new(&a.name).cmp(&VersionKey::new(&b.name))))
    }

    /// Download URL of a version's archive
    ///
    /// The preferred format is used when the remote lists it, otherwise the other
    /// format. Returns the URL and the format it points to.
    pub async fn archive_url(
        &mut self,
        name: &str,
        preferred: ArchiveFormat,
    ) -> UpliftResult<(String, ArchiveFormat)> {
        let record = self
            .lookup(name)
            .await?
            .ok_or_else(|| UpliftError::NotFound(format!("Version {} is not published", name)))?;

        [preferred, preferred.fallback()]
            .into_iter()
            .find_map(|format| record.archive_url(format).map(|url| (url.to_string(), format)))
            .ok_or_else(|| {
                UpliftError::NotFound(format!("Version {} has no downloadable archive", name))
            })
    }

    /// Zipball URL of a version
    pub async fn zipball_url(&mut self, name: &str) -> UpliftResult<Option<String>> {
        Ok(self
            .lookup(name)
            .await?
            .and_then(|r| r.archive_url(ArchiveFormat::Zip))
            .map(str::to_string))
    }

    /// Tarball URL of a version
    pub async fn tarball_url(&mut self, name: &str) -> UpliftResult<Option<String>> {
        Ok(self
            .lookup(name)
            .await?
            .and_then(|r| r.archive_url(ArchiveFormat::TarGz))
            .map(str::to_string))
    }

    /// Title of a release, empty when it has none
    pub async fn title(&mut self, name: &str) -> UpliftResult<String> {
        Ok(self
            .lookup(name)
            .await?
            .and_then(|r| r.title.clone())
            .unwrap_or_default())
    }

    /// Release notes (Markdown), empty when there are none
    pub async fn description(&mut self, name: &str) -> UpliftResult<String> {
        Ok(self
            .lookup(name)
            .await?
            .and_then(|r| r.body.clone())
            .unwrap_or_default())
    }

    fn cached(&self) -> &[ReleaseRecord] {
        self.cache
            .as_ref()
            .map(|c| c.records.as_slice())
            .unwrap_or(&[])
    }
}

/// Insert keeping the first position of a name but the last record listed for it
fn insert_record(records: &mut Vec<ReleaseRecord>, record: ReleaseRecord) {
    match records.iter_mut().find(|r| r.name == record.name) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
