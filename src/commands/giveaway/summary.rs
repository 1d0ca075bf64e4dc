use std::sync::Arc;

use crate::commands::giveaway::models::{Entrant, GiveawayRecord};
use crate::commands::giveaway::parser::humanize_duration;
use crate::db::GiveawayRepository;
use crate::error::{Error, Result};

pub const SUMMARY_NOT_FOUND_MESSAGE: &str = "Giveaway not found";

// Read-only view over a stored giveaway, as it is shown on the summary page.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawaySummary {
    pub id: u64,
    pub title: String,
    pub host: Entrant,
    pub duration: String,
    pub description: Option<String>,
    pub winner_count: usize,
    pub entrant_count: usize,
    pub winners: Vec<Entrant>,
    pub entrants: Vec<Entrant>,
}

impl From<GiveawayRecord> for GiveawaySummary {
    fn from(record: GiveawayRecord) -> Self {
        GiveawaySummary {
            id: record.id,
            duration: humanize_duration(record.duration_seconds),
            winner_count: record.winners.len(),
            entrant_count: record.entrants.len(),
            title: record.title,
            host: record.host,
            description: record.description,
            winners: record.winners,
            entrants: record.entrants,
        }
    }
}

pub struct SummaryView {
    repository: Arc<dyn GiveawayRepository>,
}

impl SummaryView {
    pub fn new(repository: Arc<dyn GiveawayRepository>) -> Self {
        SummaryView { repository }
    }

    pub async fn lookup(&self, id: u64) -> Result<GiveawaySummary> {
        match self.repository.find_by_id(id).await {
            Ok(record) => Ok(GiveawaySummary::from(record)),
            Err(Error::NotFound(_)) => Err(Error::NotFound(SUMMARY_NOT_FOUND_MESSAGE.to_string())),
            Err(err) => Err(err),
        }
    }
}
