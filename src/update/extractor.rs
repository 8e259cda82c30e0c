use crate::core::{UpliftError, UpliftResult};
use crate::update::archive::{ArchiveFormat, ArchiveHandle};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tar::Archive;
use tracing::{debug, info};
use zip::ZipArchive;

/// Extracts release archives (zipball, tarball) next to the archive file
///
/// Archives produced by the source host hold a single top-level directory,
/// conventionally `<owner>-<repo>-<commit>`. Its name is what `extract` returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract an archive into the directory that contains it
    ///
    /// Existing files at the same relative paths are overwritten. The archive
    /// itself is left in place.
    ///
    /// Returns the name (not the path) of the archive's top-level directory.
    pub fn extract(&self, archive: &ArchiveHandle) -> UpliftResult<String> {
        let dest_dir = archive
            .parent_dir()
            .map_err(|e| UpliftError::Extraction(e.to_string()))?;
        debug!(
            archive = %archive.path().display(),
            format = %archive.format(),
            "Extracting archive"
        );

        let root = match archive.format() {
            ArchiveFormat::Zip => self.extract_zip(archive.path(), dest_dir),
            ArchiveFormat::TarGz => self.extract_targz(archive.path(), dest_dir),
        }?;

        info!(root = %root, dest = %dest_dir.display(), "Archive extracted");
        Ok(root)
    }

    fn extract_zip(&self, archive_path: &Path, dest_dir: &Path) -> UpliftResult<String> {
        let file = File::open(archive_path).map_err(|e| open_failed(archive_path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| {
            UpliftError::Extraction(format!(
                "{} is not a valid zip archive: {}",
                archive_path.display(),
                e
            ))
        })?;

        if archive.len() == 0 {
            return Err(empty_archive(archive_path));
        }

        let root = {
            let first = archive.by_index(0).map_err(|e| corrupt(archive_path, e))?;
            top_level_dir(first.name(), first.is_dir()).ok_or_else(|| no_root_dir(archive_path))?
        };

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| corrupt(archive_path, e))?;
            let relative = entry
                .enclosed_name()
                .map(|p| p.to_path_buf())
                .ok_or_else(|| {
                    UpliftError::Extraction(format!(
                        "Entry '{}' in {} points outside the extraction directory",
                        entry.name(),
                        archive_path.display()
                    ))
                })?;
            let target = dest_dir.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| write_failed(&target, e))?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
            }
            let mut out = File::create(&target).map_err(|e| write_failed(&target, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| corrupt(archive_path, e))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&target, fs::Permissions::from_mode(mode))
                        .map_err(|e| write_failed(&target, e))?;
                }
            }
        }

        Ok(root)
    }

    fn extract_targz(&self, archive_path: &Path, dest_dir: &Path) -> UpliftResult<String> {
        let file = File::open(archive_path).map_err(|e| open_failed(archive_path, e))?;
        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_overwrite(true);
        archive.set_preserve_permissions(true);

        let mut root: Option<String> = None;
        let entries = archive.entries().map_err(|e| corrupt(archive_path, e))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| corrupt(archive_path, e))?;
            let kind = entry.header().entry_type();

            // GitHub tarballs open with a pax_global_header carrying the commit id
            if kind.is_pax_global_extensions() || kind.is_pax_local_extensions() {
                continue;
            }

            if root.is_none() {
                let name = entry
                    .path()
                    .map_err(|e| corrupt(archive_path, e))?
                    .to_string_lossy()
                    .into_owned();
                root = Some(
                    top_level_dir(&name, kind.is_dir()).ok_or_else(|| no_root_dir(archive_path))?,
                );
            }

            let unpacked = entry
                .unpack_in(dest_dir)
                .map_err(|e| corrupt(archive_path, e))?;
            if !unpacked {
                return Err(UpliftError::Extraction(format!(
                    "An entry in {} points outside the extraction directory",
                    archive_path.display()
                )));
            }
        }

        root.ok_or_else(|| empty_archive(archive_path))
    }
}

/// First path component of an archive entry, if the entry sits inside a directory
fn top_level_dir(entry_name: &str, is_dir: bool) -> Option<String> {
    let mut components = entry_name
        .split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".");
    let first = components.next()?;

    if components.next().is_some() || is_dir {
        Some(first.to_string())
    } else {
        None
    }
}

fn open_failed(path: &Path, err: io::Error) -> UpliftError {
    UpliftError::Extraction(format!("Cannot open {}: {}", path.display(), err))
}

fn write_failed(path: &Path, err: io::Error) -> UpliftError {
    UpliftError::Extraction(format!("Cannot write {}: {}", path.display(), err))
}

fn corrupt(path: &Path, err: impl std::fmt::Display) -> UpliftError {
    UpliftError::Extraction(format!(
        "{} could not be read, it might be corrupted: {}",
        path.display(),
        err
    ))
}

fn empty_archive(path: &Path) -> UpliftError {
    UpliftError::Extraction(format!("{} contains no entries", path.display()))
}

fn no_root_dir(path: &Path) -> UpliftError {
    UpliftError::Extraction(format!(
        "{} has no root directory. Files at root level not supported.",
        path.display()
    ))
}
