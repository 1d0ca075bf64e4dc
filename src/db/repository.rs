use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::commands::giveaway::models::{Entrant, GiveawayRecord, Participant};
use crate::db::ids::decode_ids;
use crate::db::models::{parse_id, GiveawayRow, UserRow};
use crate::error::{Error, Result};

const SELECT_GIVEAWAY: &str = r#"
    SELECT message_id, host_id, channel_id, guild_id, title, winner_target,
           duration_seconds, description, entry_count, entrants, winners
    FROM giveaways
"#;

#[async_trait]
pub trait GiveawayRepository: Send + Sync {
    // Writes the record and the snapshots of all referenced users at once.
    async fn save(&self, record: &GiveawayRecord) -> Result<()>;

    async fn find_by_id(&self, id: u64) -> Result<GiveawayRecord>;

    async fn find_all(&self) -> Result<Vec<GiveawayRecord>>;
}

pub struct SqliteGiveawayRepository {
    pool: Pool<Sqlite>,
}

impl SqliteGiveawayRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn find_user(&self, user_id: u64) -> Result<Option<Participant>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT user_id, username, display_name, avatar_url, created_at, joined_at
            FROM users WHERE user_id = ?"#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Participant::try_from).transpose()
    }

    // Resolves the stored identifiers into entrants, using the user snapshots when they exist.
    async fn to_record(&self, row: GiveawayRow) -> Result<GiveawayRecord> {
        let host_id = parse_id(&row.host_id, "host_id")?;
        let entrant_ids = decode_ids(&row.entrants);
        let winner_ids = decode_ids(&row.winners);

        let mut users: HashMap<u64, Option<Participant>> = HashMap::new();
        for user_id in std::iter::once(host_id)
            .chain(entrant_ids.iter().copied())
            .chain(winner_ids.iter().copied())
        {
            if !users.contains_key(&user_id) {
                let user = self.find_user(user_id).await?;
                users.insert(user_id, user);
            }
        }

        let to_entrant = |user_id: u64| match users.get(&user_id).cloned().flatten() {
            Some(participant) => Entrant::Known(participant),
            None => Entrant::Unknown(user_id),
        };

        Ok(GiveawayRecord {
            id: parse_id(&row.message_id, "message_id")?,
            host: to_entrant(host_id),
            channel_id: parse_id(&row.channel_id, "channel_id")?,
            guild_id: row
                .guild_id
                .as_deref()
                .map(|guild_id| parse_id(guild_id, "guild_id"))
                .transpose()?,
            title: row.title,
            winner_target: u32::try_from(row.winner_target).map_err(|_| {
                Error::Serialization(format!("Invalid winner count: {}", row.winner_target))
            })?,
            duration_seconds: u64::try_from(row.duration_seconds).map_err(|_| {
                Error::Serialization(format!("Invalid duration: {}", row.duration_seconds))
            })?,
            description: row.description,
            entrants: entrant_ids.into_iter().map(to_entrant).collect(),
            winners: winner_ids.into_iter().map(to_entrant).collect(),
        })
    }
}

#[async_trait]
impl GiveawayRepository for SqliteGiveawayRepository {
    async fn save(&self, record: &GiveawayRecord) -> Result<()> {
        record.validate()?;
        let row = GiveawayRow::from_record(record)?;

        let participants = std::iter::once(&record.host)
            .chain(record.entrants.iter())
            .chain(record.winners.iter())
            .filter_map(|entrant| entrant.participant());

        let mut tx = self.pool.begin().await?;
        for participant in participants {
            let user = UserRow::from(participant);
            sqlx::query(
                r#"INSERT INTO users (user_id, username, display_name, avatar_url, created_at, joined_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    username = excluded.username,
                    display_name = excluded.display_name,
                    avatar_url = excluded.avatar_url,
                    created_at = COALESCE(excluded.created_at, users.created_at),
                    joined_at = COALESCE(excluded.joined_at, users.joined_at)"#,
            )
            .bind(&user.user_id)
            .bind(&user.username)
            .bind(&user.display_name)
            .bind(&user.avatar_url)
            .bind(user.created_at)
            .bind(user.joined_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"INSERT INTO giveaways
            (message_id, host_id, channel_id, guild_id, title, winner_target,
             duration_seconds, description, entry_count, entrants, winners)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(message_id) DO UPDATE SET
                host_id = excluded.host_id,
                channel_id = excluded.channel_id,
                guild_id = excluded.guild_id,
                title = excluded.title,
                winner_target = excluded.winner_target,
                duration_seconds = excluded.duration_seconds,
                description = excluded.description,
                entry_count = excluded.entry_count,
                entrants = excluded.entrants,
                winners = excluded.winners"#,
        )
        .bind(&row.message_id)
        .bind(&row.host_id)
        .bind(&row.channel_id)
        .bind(&row.guild_id)
        .bind(&row.title)
        .bind(row.winner_target)
        .bind(row.duration_seconds)
        .bind(&row.description)
        .bind(row.entry_count)
        .bind(&row.entrants)
        .bind(&row.winners)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> Result<GiveawayRecord> {
        let row = sqlx::query_as::<_, GiveawayRow>(&format!(
            "{} WHERE message_id = ?",
            SELECT_GIVEAWAY
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.to_record(row).await,
            None => Err(Error::NotFound(format!("The giveaway {} was not found.", id))),
        }
    }

    async fn find_all(&self) -> Result<Vec<GiveawayRecord>> {
        let rows = sqlx::query_as::<_, GiveawayRow>(&format!("{} ORDER BY rowid", SELECT_GIVEAWAY))
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.to_record(row).await?);
        }
        Ok(records)
    }
}
