//! Service container for dependency injection

use super::traits::{ConfigProvider, Transport};
use crate::config::Config;
use crate::core::UpliftResult;
use crate::github::GitHubClient;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration and the transport as trait objects so tests can
/// swap in mocks.
///
/// # Example (Testing)
///
/// ```
/// use uplift::di::{ConfigProvider, ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let config = Arc::new(MockConfigProvider::default());
/// let transport = Arc::new(MockTransport::new());
///
/// let container = ServiceContainer::with_providers(config, transport);
/// assert_eq!(container.config().repository(), "app");
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub transport: Arc<dyn Transport>,
}

impl ServiceContainer {
    /// Create a service container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`
    /// (for example an unparsable proxy).
    pub fn new(config: Config) -> UpliftResult<Self> {
        let transport = GitHubClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(config: Arc<dyn ConfigProvider>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get a shared handle to the transport
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_config() {
        let config = Config::default().with_repository("octo/app").unwrap();
        let container = ServiceContainer::new(config).unwrap();
        assert_eq!(container.config().owner(), "octo");
        assert_eq!(container.config().api_url(), "https://api.github.com");
    }

    #[test]
    fn test_temp_dir_through_provider() {
        let config = Config {
            temp_dir: Some("/srv/uplift/downloads".to_string()),
            ..Config::default()
        };
        let container = ServiceContainer::new(config).unwrap();
        assert_eq!(
            container.config().temp_dir().unwrap(),
            std::path::PathBuf::from("/srv/uplift/downloads")
        );

        let mock = crate::di::mocks::MockConfigProvider::default();
        let expected = mock.temp_dir.clone();
        let container = ServiceContainer::with_providers(
            std::sync::Arc::new(mock),
            std::sync::Arc::new(crate::di::mocks::MockTransport::new()),
        );
        assert_eq!(container.config().temp_dir().unwrap(), expected);
    }

    #[test]
    fn test_new_rejects_bad_proxy() {
        let config = Config {
            proxy: Some("http://[::1".to_string()),
            ..Config::default()
        };
        assert!(ServiceContainer::new(config).is_err());
    }
}
