use crate::core::{UpliftError, UpliftResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counts reported by a successful merge
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Files copied into the destination and removed from the source
    pub files_moved: usize,
    /// Destination directories that did not exist before the merge
    pub directories_created: usize,
}

/// Moves an extracted release tree into the install root
///
/// Files in the destination with the same relative path are overwritten,
/// everything else in the destination is left alone. Nothing is rolled back
/// on failure: back up the destination before calling [`TreeInstaller::merge`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeInstaller;

enum Step {
    Visit {
        source: PathBuf,
        destination: PathBuf,
    },
    Move {
        source: PathBuf,
        destination: PathBuf,
    },
    #[cfg(unix)]
    Link {
        source: PathBuf,
        destination: PathBuf,
    },
    RemoveSource(PathBuf),
}

impl TreeInstaller {
    pub fn new() -> Self {
        Self
    }

    /// Recursively move every file under `source` into `destination`
    ///
    /// Entries are walked depth-first in file name order: a subdirectory is merged
    /// as soon as the walk reaches it, before the entries that sort after it. Each
    /// source directory is removed once its content has been moved. Symbolic links
    /// are recreated in the destination rather than followed (on Unix).
    ///
    /// The first copy failure stops the walk and is returned as
    /// [`UpliftError::Overwrite`]. Removal of the source directories entered so far
    /// is still attempted, so `source` may or may not exist afterwards.
    ///
    /// A missing `source` is treated as already merged.
    pub fn merge(&self, source: &Path, destination: &Path) -> UpliftResult<MergeSummary> {
        if !source.exists() {
            debug!(source = %source.display(), "Nothing to merge");
            return Ok(MergeSummary::default());
        }
        if !source.is_dir() {
            return Err(UpliftError::Overwrite(format!(
                "{} is not a directory",
                source.display()
            )));
        }

        let mut summary = MergeSummary::default();
        let mut stack = vec![Step::Visit {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        }];

        while let Some(step) = stack.pop() {
            if let Err(err) = self.run_step(step, &mut stack, &mut summary) {
                warn!(error = %err, "Merge stopped partway");
                while let Some(pending) = stack.pop() {
                    if let Step::RemoveSource(dir) = pending {
                        remove_source_dir(&dir);
                    }
                }
                return Err(err);
            }
        }

        info!(
            files = summary.files_moved,
            directories = summary.directories_created,
            destination = %destination.display(),
            "Merged release tree"
        );
        Ok(summary)
    }

    fn run_step(
        &self,
        step: Step,
        stack: &mut Vec<Step>,
        summary: &mut MergeSummary,
    ) -> UpliftResult<()> {
        match step {
            Step::RemoveSource(dir) => {
                remove_source_dir(&dir);
                Ok(())
            }
            Step::Visit {
                source,
                destination,
            } => self.visit(&source, &destination, stack, summary),
            Step::Move {
                source,
                destination,
            } => {
                move_file(&source, &destination)?;
                summary.files_moved += 1;
                Ok(())
            }
            #[cfg(unix)]
            Step::Link {
                source,
                destination,
            } => {
                move_link(&source, &destination)?;
                summary.files_moved += 1;
                Ok(())
            }
        }
    }

    /// Create the destination directory and queue the entries of `source`
    fn visit(
        &self,
        source: &Path,
        destination: &Path,
        stack: &mut Vec<Step>,
        summary: &mut MergeSummary,
    ) -> UpliftResult<()> {
        if !destination.is_dir() {
            fs::create_dir(destination).map_err(|e| {
                UpliftError::Overwrite(format!(
                    "Failed to create directory {}: {}",
                    destination.display(),
                    e
                ))
            })?;
            summary.directories_created += 1;
        }

        stack.push(Step::RemoveSource(source.to_path_buf()));

        let mut entries = fs::read_dir(source)
            .and_then(|dir| dir.collect::<io::Result<Vec<_>>>())
            .map_err(|e| {
                UpliftError::Overwrite(format!("Failed to read {}: {}", source.display(), e))
            })?;
        entries.sort_by_key(|entry| entry.file_name());

        // Reversed so the stack pops them in name order
        for entry in entries.into_iter().rev() {
            let from = entry.path();
            let to = destination.join(entry.file_name());
            let file_type = entry.file_type().map_err(|e| {
                UpliftError::Overwrite(format!("Failed to inspect {}: {}", from.display(), e))
            })?;

            let step = if file_type.is_symlink() {
                link_step(from, to)
            } else if file_type.is_dir() {
                Step::Visit {
                    source: from,
                    destination: to,
                }
            } else {
                Step::Move {
                    source: from,
                    destination: to,
                }
            };
            stack.push(step);
        }
        Ok(())
    }
}

#[cfg(unix)]
fn link_step(source: PathBuf, destination: PathBuf) -> Step {
    Step::Link {
        source,
        destination,
    }
}

/// Without symlink support the link is followed instead
#[cfg(not(unix))]
fn link_step(source: PathBuf, destination: PathBuf) -> Step {
    if source.is_dir() {
        Step::Visit {
            source,
            destination,
        }
    } else {
        Step::Move {
            source,
            destination,
        }
    }
}

fn move_file(from: &Path, to: &Path) -> UpliftResult<()> {
    fs::copy(from, to).map_err(|e| {
        UpliftError::Overwrite(format!(
            "Failed to copy {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })?;
    if let Err(e) = fs::remove_file(from) {
        warn!(file = %from.display(), error = %e, "Could not remove merged file");
    }
    Ok(())
}

/// Recreate the symlink `from` at `to`, replacing a file or link already there
#[cfg(unix)]
fn move_link(from: &Path, to: &Path) -> UpliftResult<()> {
    let link_failed = |e: io::Error| {
        UpliftError::Overwrite(format!(
            "Failed to link {} to {}: {}",
            to.display(),
            from.display(),
            e
        ))
    };

    let target = fs::read_link(from).map_err(link_failed)?;
    match fs::symlink_metadata(to) {
        Ok(meta) if meta.is_dir() => {
            return Err(UpliftError::Overwrite(format!(
                "Cannot replace directory {} with a symbolic link",
                to.display()
            )))
        }
        Ok(_) => fs::remove_file(to).map_err(link_failed)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(link_failed(e)),
    }
    std::os::unix::fs::symlink(&target, to).map_err(link_failed)?;

    if let Err(e) = fs::remove_file(from) {
        warn!(file = %from.display(), error = %e, "Could not remove merged link");
    }
    Ok(())
}

fn remove_source_dir(dir: &Path) {
    match fs::remove_dir(dir) {
        Ok(()) => debug!(dir = %dir.display(), "Removed merged directory"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %dir.display(), error = %e, "Could not remove source directory"),
    }
}
