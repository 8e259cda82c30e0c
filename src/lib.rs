//! Uplift: keep a deployed application in step with its GitHub releases
//!
//! This crate provides the main Uplift library, re-exporting core functionality
//! from `uplift-core` and organizing the release catalog, the HTTP transport and
//! the install pipeline.

pub use uplift_core::{format_error_with_help, ErrorHelp, UpliftError, UpliftResult};

/// Core module re-exported from uplift-core.
pub mod core {
    pub use uplift_core::core::*;
    pub use uplift_core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub API transport.
pub mod github;

/// Release and tag listings.
pub mod release;

/// Download, extraction and installation of releases.
pub mod update;
