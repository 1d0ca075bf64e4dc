use std::sync::Arc;

use crate::commands::giveaway::formatters::{DefaultGiveawayFormatter, GiveawayFormatter};
use crate::commands::giveaway::strategies::{UniformRandomStrategy, WinnerStrategy};
use crate::config::Config;
use crate::db::GiveawayRepository;
use crate::messenger::Messenger;

// Collaborators shared by every giveaway session and the reroll service.
#[derive(Clone)]
pub struct GiveawayServices {
    pub messenger: Arc<dyn Messenger>,
    pub repository: Arc<dyn GiveawayRepository>,
    pub strategy: Arc<dyn WinnerStrategy>,
    pub formatter: Arc<dyn GiveawayFormatter>,
    pub config: Arc<Config>,
}

impl GiveawayServices {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        repository: Arc<dyn GiveawayRepository>,
        config: Arc<Config>,
    ) -> Self {
        GiveawayServices {
            messenger,
            repository,
            strategy: Arc::new(UniformRandomStrategy::new()),
            formatter: Arc::new(DefaultGiveawayFormatter::new()),
            config,
        }
    }

    #[cfg(test)]
    pub fn with_strategy(mut self, strategy: Arc<dyn WinnerStrategy>) -> Self {
        self.strategy = strategy;
        self
    }
}
