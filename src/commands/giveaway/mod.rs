pub mod formatters;
pub mod handlers;
pub mod ledger;
pub mod manager;
pub mod models;
pub mod parser;
pub mod reroll;
pub mod services;
pub mod session;
pub mod strategies;
pub mod summary;
pub mod timer;
pub mod utils;

pub use crate::commands::giveaway::handlers::{
    // Giveaway lifecycle
    create_giveaway,

    // Finished giveaways
    giveaway_summary,
    reroll,
    reroll_giveaway,
};
