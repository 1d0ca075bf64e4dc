// Discord flavoured texts for the public giveaway messages and notifications
use crate::commands::giveaway::formatters::base::{GiveawayFormatter, GiveawayView, HostSummary};
use crate::commands::giveaway::models::{mention, Entrant};
use crate::commands::giveaway::summary::GiveawaySummary;

// Longer lists of entrants are replaced by their count
pub const MAX_ENTRANTS_LIST_LENGTH: usize = 1000;

pub struct DefaultGiveawayFormatter;

impl DefaultGiveawayFormatter {
    pub fn new() -> Self {
        DefaultGiveawayFormatter {}
    }

    fn mentions(&self, user_ids: &[u64]) -> String {
        user_ids
            .iter()
            .map(|user_id| mention(*user_id))
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn entrants_list(&self, entrants: &[u64]) -> String {
        let text = self.mentions(entrants);
        if text.len() > MAX_ENTRANTS_LIST_LENGTH {
            format!("{} entrants (list too long to display)", entrants.len())
        } else if text.is_empty() {
            "No entrants".to_string()
        } else {
            text
        }
    }

    fn names(&self, entrants: &[Entrant]) -> String {
        match entrants.is_empty() {
            true => "None".to_string(),
            false => entrants
                .iter()
                .map(|entrant| format!("{} ({})", entrant.display_name(), entrant.user_id()))
                .collect::<Vec<String>>()
                .join(", "),
        }
    }
}

impl Default for DefaultGiveawayFormatter {
    fn default() -> Self {
        DefaultGiveawayFormatter::new()
    }
}

impl GiveawayFormatter for DefaultGiveawayFormatter {
    fn giveaway_message(&self, view: &GiveawayView) -> String {
        let mut lines = vec![format!("🎉 **{}** 🎉", view.title)];
        if let Some(description) = view.description {
            lines.push(description.to_string());
        }
        lines.push(String::new());

        let ends = format!("<t:{}:R> (<t:{}:f>)", view.ends_at, view.ends_at);
        match view.winners {
            None => {
                lines.push(format!("⏰ Ends: {}", ends));
                lines.push(format!("👑 Hosted by: {}", mention(view.host_id)));
                lines.push(format!("👥 Entries: **{}**", view.entry_count));
                lines.push(format!("🏆 Winners: **{}**", view.winner_target));
            }
            Some(winners) => {
                let winners = match winners.is_empty() {
                    true => "No winners".to_string(),
                    false => self.mentions(winners),
                };
                lines.push(format!("⏰ Ended: {}", ends));
                lines.push(format!("👑 Hosted by: {}", mention(view.host_id)));
                lines.push(format!("👥 Entries: **{}**", view.entry_count));
                lines.push(format!("🏆 Winners: {}", winners));
            }
        }

        lines.join("\n")
    }

    fn no_entrants(&self, host_id: u64) -> String {
        format!("{} No one entered your giveaway", mention(host_id))
    }

    fn winners_announcement(&self, title: &str, winners: &[u64]) -> String {
        format!(
            "🎊🎊 Congratulations {} **You won the {}** 🎊🎊",
            self.mentions(winners),
            title
        )
    }

    fn winner_notification(&self, title: &str, winner: &Entrant, jump_url: &str) -> String {
        format!(
            "🏆 **Congratulations! You Won!** 🏆\nHey {}, you won the **{}** giveaway!\n🎁 Prize: {}\n🔗 Giveaway Link: {}",
            winner.mention(),
            title,
            title,
            jump_url
        )
    }

    fn host_summary(&self, summary: &HostSummary) -> String {
        let winners = match summary.winners.is_empty() {
            true => "None".to_string(),
            false => self.mentions(summary.winners),
        };

        [
            "📊 **Giveaway Summary** 📊".to_string(),
            format!("Here's the summary for your giveaway: **{}**", summary.title),
            format!("🎁 Prize: {}", summary.title),
            format!("🏆 Winners: {}", winners),
            format!("👥 Entrants: {}", self.entrants_list(summary.entrants)),
            format!("🆔 Giveaway ID: {}", summary.message_id),
            format!("🔗 Giveaway Link: {}", summary.jump_url),
        ]
        .join("\n")
    }

    fn summary_page(&self, summary: &GiveawaySummary) -> String {
        let mut lines = vec![
            format!("📊 **{}** 📊", summary.title),
            format!("👑 Host: {}", summary.host.display_name()),
            format!("⏰ Duration: {}", summary.duration),
        ];
        if let Some(description) = &summary.description {
            lines.push(format!("📝 Description: {}", description));
        }
        lines.push(format!(
            "🏆 Winners ({}): {}",
            summary.winner_count,
            self.names(&summary.winners)
        ));

        let entrants = self.names(&summary.entrants);
        let entrants = match entrants.len() > MAX_ENTRANTS_LIST_LENGTH {
            true => "list too long to display".to_string(),
            false => entrants,
        };
        lines.push(format!("👥 Entrants ({}): {}", summary.entrant_count, entrants));
        lines.join("\n")
    }
}
