//! Remote release listings
//!
//! A [`ReleaseCatalog`] fetches the release (or tag) listing of one repository
//! once and answers version queries against it.

pub mod catalog;
pub mod record;

pub use catalog::ReleaseCatalog;
pub use record::{ReleaseRecord, ReleaseSource};
