use std::sync::Arc;

use crate::cli::Cli;
use crate::config::Config;
use crate::directory::{EntityDirectory, RosterDirectory};
use crate::error::{Result, VeilError};
use crate::messenger::{ConsoleMessenger, Messenger};
use crate::provider::{DisguiseProvider, LocalProvider, Target};
use crate::resolver::SkinResolver;
use crate::sched::Scheduler;
use crate::service::DisguiseService;

pub struct AppContext {
    pub config: Config,
    pub directory: Arc<RosterDirectory>,
    pub provider: Arc<dyn DisguiseProvider>,
    pub resolver: Arc<SkinResolver>,
    pub scheduler: Scheduler,
    pub service: Arc<DisguiseService>,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;

        let directory = RosterDirectory::shared(&config.roster.online, &config.roster.known);
        let provider: Arc<dyn DisguiseProvider> = Arc::new(LocalProvider::new(directory.clone()));
        let resolver = Arc::new(SkinResolver::new(&config.resolver, directory.clone())?);
        let messenger: Arc<dyn Messenger> = Arc::new(ConsoleMessenger);
        let scheduler = Scheduler::new();

        let service = Arc::new(DisguiseService::new(
            Arc::clone(&provider),
            resolver.clone(),
            messenger,
            scheduler.handle(),
        ));

        Ok(Self {
            config,
            directory,
            provider,
            resolver,
            scheduler,
            service,
        })
    }

    /// Resolve the acted-on entity from an explicit name or the configured
    /// default, against the roster.
    pub fn target(&self, explicit: Option<&str>) -> Result<Target> {
        let name = explicit
            .map(str::to_string)
            .or_else(|| self.config.provider.default_target.clone())
            .ok_or_else(|| {
                VeilError::MissingConfig(
                    "no target given and [provider].default_target is unset".to_string(),
                )
            })?;

        self.directory
            .online(&name)
            .or_else(|| self.directory.known(&name))
            .ok_or(VeilError::UnknownEntity(name))
    }
}
