//! GitHub integration
//!
//! This module provides the HTTP transport used by the updater:
//! - Fetch the release and tag listings of a repository
//! - Download zipballs and tarballs
//! - Decode the listings into release records

pub mod client;
pub mod types;

pub use client::{listing_url, GitHubClient};
pub use types::{parse_listing, GitHubRelease, GitHubTag};
