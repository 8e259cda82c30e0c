//! Core utilities for Uplift.
//!
//! Holds the pieces shared by the library and the CLI that do not touch the
//! network: the error type, version ordering, and platform paths.

pub mod core;

pub use core::error::{UpliftError, UpliftResult};
pub use core::error_help::{format_error_with_help, ErrorHelp};
pub use core::version::{compare, compare_versions, VersionKey};
