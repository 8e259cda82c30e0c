pub mod check;
pub mod compare;
pub mod install;
pub mod releases;

use clap::Args;
use std::path::PathBuf;
use uplift::config::Config;
use uplift::core::UpliftResult;
use uplift::di::ServiceContainer;
use uplift::update::Updater;

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository to track, as owner/repo
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Proxy for all requests (host:port or URL)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Include prereleases
    #[arg(long, global = true)]
    pub prereleases: bool,
}

impl GlobalOptions {
    /// Load the config file and apply command line overrides
    pub fn load_config(&self) -> UpliftResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(repo) = &self.repo {
            config = config.with_repository(repo)?;
        }
        if let Some(server) = &self.server {
            config.api_url = server.clone();
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        if self.prereleases {
            config.include_prereleases = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the production services for `config`
    pub fn container(&self, config: &Config) -> UpliftResult<ServiceContainer> {
        ServiceContainer::new(config.clone())
    }

    /// Build an updater for the configured repository
    pub fn updater(&self, config: &Config) -> UpliftResult<Updater> {
        let container = self.container(config)?;
        Ok(Updater::new(container.config(), container.transport()))
    }
}
