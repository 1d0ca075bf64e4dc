use crate::commands::giveaway::models::Entrant;
use crate::commands::giveaway::summary::GiveawaySummary;

// State of the public giveaway message at the moment of rendering.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawayView<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub host_id: u64,
    // Unix timestamp (in seconds) of the end of the countdown
    pub ends_at: i64,
    pub entry_count: usize,
    pub winner_target: u32,
    // Filled in once the giveaway has ended
    pub winners: Option<&'a [u64]>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HostSummary<'a> {
    pub title: &'a str,
    pub message_id: u64,
    pub jump_url: &'a str,
    pub winners: &'a [u64],
    pub entrants: &'a [u64],
}

pub trait GiveawayFormatter: Send + Sync {
    // Text of the public giveaway message, both during the countdown and after the end.
    fn giveaway_message(&self, view: &GiveawayView) -> String;
    // Posted in the channel when nobody entered the giveaway.
    fn no_entrants(&self, host_id: u64) -> String;
    fn winners_announcement(&self, title: &str, winners: &[u64]) -> String;
    // Direct message for every winner.
    fn winner_notification(&self, title: &str, winner: &Entrant, jump_url: &str) -> String;
    // Direct message for the host once the winners are drawn.
    fn host_summary(&self, summary: &HostSummary) -> String;
    fn summary_page(&self, summary: &GiveawaySummary) -> String;
}
