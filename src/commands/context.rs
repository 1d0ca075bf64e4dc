use poise::ApplicationContext as PoiseApplicationContext;
use poise::Context as PoiseContext;

use crate::commands::giveaway::manager::GiveawayManager;
use crate::commands::giveaway::reroll::RerollService;
use crate::commands::giveaway::services::GiveawayServices;
use crate::commands::giveaway::summary::SummaryView;

// User data, which is stored and accessible in all command invocations
pub struct UserData {
    pub manager: GiveawayManager,
    pub rerolls: RerollService,
    pub summaries: SummaryView,
}

impl UserData {
    pub fn new(services: GiveawayServices) -> Self {
        UserData {
            rerolls: RerollService::new(services.clone()),
            summaries: SummaryView::new(services.repository.clone()),
            manager: GiveawayManager::new(services),
        }
    }
}

// Generic context available across Poise commands
pub type Context<'a> = PoiseContext<'a, UserData, crate::error::Error>;

// Slash commands that need to open a modal
pub type ApplicationContext<'a> = PoiseApplicationContext<'a, UserData, crate::error::Error>;
