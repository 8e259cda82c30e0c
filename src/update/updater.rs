use crate::core::path::{ensure_dir, file_name_for_version};
use crate::core::{UpliftError, UpliftResult};
use crate::di::{ConfigProvider, Transport};
use crate::github::listing_url;
use crate::release::{ReleaseCatalog, ReleaseRecord};
use crate::update::archive::{ArchiveFormat, ArchiveHandle};
use crate::update::extractor::ArchiveExtractor;
use crate::update::merge::{MergeSummary, TreeInstaller};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Step of an install in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Resolving,
    Downloading,
    Extracting,
    Merging,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::Resolving => "resolving",
            InstallStage::Downloading => "downloading",
            InstallStage::Extracting => "extracting",
            InstallStage::Merging => "merging",
        };
        f.write_str(name)
    }
}

/// Where the last install got to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstallState {
    #[default]
    Idle,
    Running(InstallStage),
    Done,
    Failed { stage: InstallStage, cause: String },
}

/// Outcome of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub version: String,
    /// Where the archive was downloaded (removed once extracted)
    pub archive: PathBuf,
    /// Name of the archive's top-level directory
    pub extracted_root: String,
    pub merge: MergeSummary,
}

/// Installs releases of one repository over a local directory
///
/// Owns the release catalog for its lifetime. An install runs its stages in order
/// (resolve, download, extract, merge) and stops at the first failing one; nothing
/// is retried or rolled back, so back up the install root first.
pub struct Updater {
    catalog: ReleaseCatalog,
    transport: Arc<dyn Transport>,
    extractor: ArchiveExtractor,
    installer: TreeInstaller,
    archive_format: ArchiveFormat,
    state: InstallState,
}

impl Updater {
    /// Create an updater for the repository named in `config`
    pub fn new(config: &dyn ConfigProvider, transport: Arc<dyn Transport>) -> Self {
        let source = config.release_source();
        let url = listing_url(config.api_url(), config.owner(), config.repository(), source);
        let catalog = ReleaseCatalog::new(Arc::clone(&transport), url, source)
            .with_prereleases(config.include_prereleases());

        Self::with_catalog(catalog, transport, config.archive_format())
    }

    pub fn with_catalog(
        catalog: ReleaseCatalog,
        transport: Arc<dyn Transport>,
        archive_format: ArchiveFormat,
    ) -> Self {
        Self {
            catalog,
            transport,
            extractor: ArchiveExtractor::new(),
            installer: TreeInstaller::new(),
            archive_format,
            state: InstallState::Idle,
        }
    }

    /// State of the last install
    pub fn state(&self) -> &InstallState {
        &self.state
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        self.archive_format
    }

    pub fn set_archive_format(&mut self, format: ArchiveFormat) {
        self.archive_format = format;
    }

    /// Include prereleases from now on, returning the previous setting
    ///
    /// A listing cached under the other setting is fetched again on next use.
    pub fn fetch_prereleases_too(&mut self, include: bool) -> bool {
        let previous = self.catalog.includes_prereleases();
        self.catalog.set_include_prereleases(include);
        previous
    }

    pub fn catalog(&self) -> &ReleaseCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ReleaseCatalog {
        &mut self.catalog
    }

    /// Fetch the listing again, discarding the cache
    pub async fn refresh(&mut self) -> UpliftResult<&[ReleaseRecord]> {
        let include = self.catalog.includes_prereleases();
        self.catalog.fetch(true, include).await
    }

    /// Name of the latest release, if any
    pub async fn latest_version(&mut self) -> UpliftResult<Option<String>> {
        Ok(self.catalog.latest().await?.map(|r| r.name.clone()))
    }

    /// Name of the first listed release newer than `version`
    pub async fn next_version(&mut self, version: &str) -> UpliftResult<Option<String>> {
        Ok(self.catalog.next(version).await?.map(|r| r.name.clone()))
    }

    pub async fn is_up_to_date(&mut self, version: &str) -> UpliftResult<bool> {
        self.catalog.is_up_to_date(version).await
    }

    pub async fn title(&mut self, version: &str) -> UpliftResult<String> {
        self.catalog.title(version).await
    }

    pub async fn description(&mut self, version: &str) -> UpliftResult<String> {
        self.catalog.description(version).await
    }

    pub fn compare_versions(&self, a: &str, b: &str) -> Ordering {
        crate::core::compare_versions(a, b)
    }

    /// Install the latest release over `root`
    pub async fn install_latest(
        &mut self,
        root: &Path,
        temp_dir: &Path,
    ) -> UpliftResult<InstallReport> {
        self.state = InstallState::Running(InstallStage::Resolving);
        let latest = match self.resolve_latest().await {
            Ok(latest) => latest,
            Err(err) => return Err(self.fail(err)),
        };
        self.install_version(&latest, root, temp_dir).await
    }

    /// Download `version`, extract it into `temp_dir` and merge it over `root`
    pub async fn install_version(
        &mut self,
        version: &str,
        root: &Path,
        temp_dir: &Path,
    ) -> UpliftResult<InstallReport> {
        info!(version = %version, root = %root.display(), "Installing release");
        match self.run_install(version, root, temp_dir).await {
            Ok(report) => {
                self.state = InstallState::Done;
                info!(
                    version = %report.version,
                    files = report.merge.files_moved,
                    "Install complete"
                );
                Ok(report)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Download the archive of `version` into `temp_dir` as `<version><ext>`
    ///
    /// `format` is used when the release offers it, otherwise the other format.
    pub async fn download_version(
        &mut self,
        version: &str,
        temp_dir: &Path,
        format: ArchiveFormat,
    ) -> UpliftResult<ArchiveHandle> {
        match self.fetch_archive(version, temp_dir, format).await {
            Ok(handle) => {
                self.state = InstallState::Done;
                Ok(handle)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn fetch_archive(
        &mut self,
        version: &str,
        temp_dir: &Path,
        format: ArchiveFormat,
    ) -> UpliftResult<ArchiveHandle> {
        self.state = InstallState::Running(InstallStage::Resolving);
        let (url, format) = self.catalog.archive_url(version, format).await?;

        self.state = InstallState::Running(InstallStage::Downloading);
        ensure_dir(temp_dir).map_err(|e| {
            UpliftError::RemoteFetch(format!(
                "Cannot prepare download directory {}: {}",
                temp_dir.display(),
                e
            ))
        })?;
        let path = temp_dir.join(format!(
            "{}{}",
            file_name_for_version(version),
            format.extension()
        ));
        let bytes = self.transport.download_to_file(&url, &path).await?;
        debug!(path = %path.display(), bytes, "Archive downloaded");

        Ok(ArchiveHandle::new(path, format))
    }

    async fn run_install(
        &mut self,
        version: &str,
        root: &Path,
        temp_dir: &Path,
    ) -> UpliftResult<InstallReport> {
        let format = self.archive_format;
        let archive = self.fetch_archive(version, temp_dir, format).await?;

        self.state = InstallState::Running(InstallStage::Extracting);
        let extracted_root = self.extractor.extract(&archive)?;
        let extracted_dir = archive
            .parent_dir()
            .map_err(|e| UpliftError::Extraction(e.to_string()))?
            .join(&extracted_root);
        if let Err(e) = std::fs::remove_file(archive.path()) {
            warn!(archive = %archive.path().display(), error = %e, "Could not remove archive");
        }

        self.state = InstallState::Running(InstallStage::Merging);
        let merge = self.installer.merge(&extracted_dir, root)?;

        Ok(InstallReport {
            version: version.to_string(),
            archive: archive.path().to_path_buf(),
            extracted_root,
            merge,
        })
    }

    async fn resolve_latest(&mut self) -> UpliftResult<String> {
        let latest = self
            .catalog
            .latest()
            .await?
            .map(|r| r.name.clone())
            .ok_or_else(|| UpliftError::NotFound("No release has been published yet".to_string()))?;

        if let Some(highest) = self.catalog.highest().await? {
            if highest.name != latest {
                warn!(
                    latest = %latest,
                    highest = %highest.name,
                    "The newest listed release is not the highest version"
                );
            }
        }
        Ok(latest)
    }

    /// Record the failure against the running stage
    fn fail(&mut self, err: UpliftError) -> UpliftError {
        let stage = match self.state {
            InstallState::Running(stage) => stage,
            _ => InstallStage::Resolving,
        };
        warn!(stage = %stage, kind = err.kind(), error = %err, "Install failed");
        self.state = InstallState::Failed {
            stage,
            cause: err.to_string(),
        };
        err
    }
}
