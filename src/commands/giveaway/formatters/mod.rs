pub mod announcement;
pub mod base;

pub use crate::commands::giveaway::formatters::announcement::DefaultGiveawayFormatter;
pub use crate::commands::giveaway::formatters::base::{GiveawayFormatter, GiveawayView, HostSummary};
