//! Downloaded archive handles and their formats

use crate::core::{UpliftError, UpliftResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Archive format offered by the source host for every release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArchiveFormat {
    /// Zipball (`.zip`)
    #[default]
    #[serde(rename = "zip", alias = ".zip", alias = "zipball")]
    Zip,
    /// Gzip-compressed tarball (`.tar.gz`)
    #[serde(rename = "tar.gz", alias = ".tar.gz", alias = "tgz", alias = "tarball")]
    TarGz,
}

impl ArchiveFormat {
    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => ".zip",
            ArchiveFormat::TarGz => ".tar.gz",
        }
    }

    /// The format to fall back to when this one has no download URL
    pub fn fallback(&self) -> Self {
        match self {
            ArchiveFormat::Zip => ArchiveFormat::TarGz,
            ArchiveFormat::TarGz => ArchiveFormat::Zip,
        }
    }

    /// Guess the format from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveFormat::Zip => write!(f, "zip"),
            ArchiveFormat::TarGz => write!(f, "tar.gz"),
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = UpliftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "zip" | "zipball" => Ok(ArchiveFormat::Zip),
            "tar.gz" | "tgz" | "tarball" => Ok(ArchiveFormat::TarGz),
            other => Err(UpliftError::Config(format!(
                "Unsupported archive format '{}'. Expected 'zip' or 'tar.gz'",
                other
            ))),
        }
    }
}

/// A downloaded archive on local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    path: PathBuf,
    format: ArchiveFormat,
}

impl ArchiveHandle {
    pub fn new(path: impl Into<PathBuf>, format: ArchiveFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Directory the archive lives in, which is also where it gets extracted
    pub fn parent_dir(&self) -> UpliftResult<&Path> {
        match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(Path::new(".")),
            Some(parent) => Ok(parent),
            None => Err(UpliftError::Path(format!(
                "Archive path {} has no parent directory",
                self.path.display()
            ))),
        }
    }
}
