//! Dependency injection infrastructure for Uplift
//!
//! The updater reaches the network and its settings only through the traits
//! defined here, so tests can replace both with in-memory mocks.
//!
//! # Example (Testing)
//! ```
//! use uplift::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let transport = Arc::new(MockTransport::new());
//!
//! let container = ServiceContainer::with_providers(config, transport);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ConfigProvider, Transport};
