
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::commands::giveaway::models::{GiveawayRecord, Participant};
use crate::db::ids::encode_ids;
use crate::error::{Error, Result};

#[derive(Debug, Clone, FromRow)]
pub struct GiveawayRow {
    pub message_id: String,
    pub host_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub title: String,
    pub winner_target: i64,
    pub duration_seconds: i64,
    pub description: Option<String>,
    pub entry_count: i64,
    pub entrants: String,
    pub winners: String,
}

impl GiveawayRow {
    pub fn from_record(record: &GiveawayRecord) -> Result<Self> {
        let duration_seconds = i64::try_from(record.duration_seconds).map_err(|_| {
            Error::Serialization(format!(
                "The duration of the giveaway {} is too long to be stored.",
                record.id
            ))
        })?;

        Ok(GiveawayRow {
            message_id: record.id.to_string(),
            host_id: record.host.user_id().to_string(),
            channel_id: record.channel_id.to_string(),
            guild_id: record.guild_id.map(|id| id.to_string()),
            title: record.title.clone(),
            winner_target: i64::from(record.winner_target),
            duration_seconds,
            description: record.description.clone(),
            entry_count: record.entry_count() as i64,
            entrants: encode_ids(&record.entrant_ids())?,
            winners: encode_ids(&record.winner_ids())?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl From<&Participant> for UserRow {
    fn from(participant: &Participant) -> Self {
        UserRow {
            user_id: participant.user_id().to_string(),
            username: participant.username().to_string(),
            display_name: participant.display_name().to_string(),
            avatar_url: participant.avatar_url().to_string(),
            created_at: participant.created_at(),
            joined_at: participant.joined_at(),
        }
    }
}

impl TryFrom<UserRow> for Participant {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        let participant = Participant::new(parse_id(&row.user_id, "user_id")?, &row.username)
            .with_display_name(&row.display_name)
            .with_avatar_url(&row.avatar_url)
            .with_created_at(row.created_at)
            .with_joined_at(row.joined_at);
        Ok(participant)
    }
}

pub fn parse_id(value: &str, column: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        Error::Serialization(format!("The {} column contains an invalid id: {}", column, value))
    })
}
