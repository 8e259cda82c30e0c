//! The install pipeline
//!
//! [`Updater`] resolves a version in the release catalog, downloads its archive,
//! unpacks it with [`ArchiveExtractor`] and moves the result over the install
//! root with [`TreeInstaller`].

pub mod archive;
pub mod extractor;
pub mod merge;
pub mod updater;

pub use archive::{ArchiveFormat, ArchiveHandle};
pub use extractor::ArchiveExtractor;
pub use merge::{MergeSummary, TreeInstaller};
pub use updater::{InstallReport, InstallStage, InstallState, Updater};
