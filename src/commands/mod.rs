pub mod context;
pub mod giveaway;

use crate::error::Error;

pub use crate::commands::context::{ApplicationContext, Context, UserData};

// Every command registered in Discord on startup
pub fn get_commands_list() -> Vec<poise::Command<UserData, Error>> {
    vec![
        giveaway::create_giveaway(),
        giveaway::reroll(),
        giveaway::reroll_giveaway(),
        giveaway::giveaway_summary(),
    ]
}
