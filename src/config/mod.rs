use crate::core::path::{config_file, ensure_dir};
use crate::core::{UpliftError, UpliftResult};
use crate::di::ConfigProvider;
use crate::release::ReleaseSource;
use crate::update::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API base URL (GitHub Enterprise servers use `https://host/api/v3`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Owner of the tracked repository
    #[serde(default)]
    pub owner: String,

    /// Name of the tracked repository
    #[serde(default)]
    pub repository: String,

    /// Listing the versions come from
    /// - "releases": published GitHub releases (default)
    /// - "tags": plain git tags
    #[serde(default)]
    pub source: ReleaseSource,

    /// Preferred archive format, "zip" (default) or "tar.gz"
    #[serde(default)]
    pub archive_format: ArchiveFormat,

    /// Whether prereleases are listed and installable
    #[serde(default)]
    pub include_prereleases: bool,

    /// Proxy for all requests, e.g. "10.0.0.1:3128" or "http://proxy:8080"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where archives are downloaded and extracted (defaults to the cache directory)
    ///
    /// Default locations:
    /// - Windows: %LOCALAPPDATA%\uplift\downloads
    /// - Linux: ~/.cache/uplift/downloads
    /// - macOS: ~/Library/Caches/uplift/downloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    "uplift".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            owner: String::new(),
            repository: String::new(),
            source: ReleaseSource::default(),
            archive_format: ArchiveFormat::default(),
            include_prereleases: false,
            proxy: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            temp_dir: None,
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory
    ///
    /// A missing file yields the defaults.
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\uplift\config.yaml
    /// - Linux: ~/.config/uplift/config.yaml
    /// - macOS: ~/Library/Application Support/uplift/config.yaml
    pub fn load() -> UpliftResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, falling back to defaults if it doesn't exist
    pub fn load_from(path: &Path) -> UpliftResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            UpliftError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> UpliftResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> UpliftResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| UpliftError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| UpliftError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Set owner and repository from an `owner/repo` string
    pub fn with_repository(mut self, slug: &str) -> UpliftResult<Self> {
        let (owner, repository) = parse_repository(slug)?;
        self.owner = owner.to_string();
        self.repository = repository.to_string();
        Ok(self)
    }

    /// Fail unless a repository to track is configured
    pub fn validate(&self) -> UpliftResult<()> {
        if self.owner.trim().is_empty() || self.repository.trim().is_empty() {
            return Err(UpliftError::Config(
                "No repository configured. Pass --repo owner/repo or set owner and repository in the config file"
                    .to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(UpliftError::Config(
                "connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the download directory path
    pub fn get_temp_dir(&self) -> UpliftResult<PathBuf> {
        match self.temp_dir.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(crate::core::path::cache_dir()?.join("downloads")),
        }
    }
}

/// Split `owner/repo` into its two halves
pub fn parse_repository(slug: &str) -> UpliftResult<(&str, &str)> {
    let slug = slug.trim().trim_end_matches('/');
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(UpliftError::Config(format!(
            "Invalid repository '{}'. Expected owner/repo",
            slug
        ))),
    }
}

// Implement ConfigProvider trait
impl ConfigProvider for Config {
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
        Duration::from_secs(self.connect_timeout_secs)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn temp_dir(&self) -> UpliftResult<PathBuf> {
        self.get_temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.source, ReleaseSource::Releases);
        assert_eq!(config.archive_format, ArchiveFormat::Zip);
        assert!(!config.include_prereleases);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent(), "uplift");
        assert!(config.proxy().is_none());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "owner: octo\nrepository: app\nsource: tags\narchive_format: tar.gz\nproxy: 10.0.0.1:3128\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.owner, "octo");
        assert_eq!(config.repository, "app");
        assert_eq!(config.source, ReleaseSource::Tags);
        assert_eq!(config.archive_format, ArchiveFormat::TarGz);
        assert_eq!(config.proxy.as_deref(), Some("10.0.0.1:3128"));
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "owner: [unterminated").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(UpliftError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");
        let mut config = Config::default().with_repository("octo/app").unwrap();
        config.include_prereleases = true;
        config.temp_dir = Some("/var/tmp/uplift".to_string());

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_repository() {
        assert_eq!(parse_repository("octo/app").unwrap(), ("octo", "app"));
        assert_eq!(parse_repository(" octo/app/ ").unwrap(), ("octo", "app"));
        assert!(parse_repository("octo").is_err());
        assert!(parse_repository("/app").is_err());
        assert!(parse_repository("octo/app/extra").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_err());
        assert!(Config::default()
            .with_repository("octo/app")
            .unwrap()
            .validate()
            .is_ok());
    }

    #[test]
    fn test_temp_dir_override() {
        let config = Config {
            temp_dir: Some("/srv/downloads".to_string()),
            ..Config::default()
        };
        assert_eq!(config.get_temp_dir().unwrap(), PathBuf::from("/srv/downloads"));
    }
}
