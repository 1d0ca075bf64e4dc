// Identifiers are stored as text, Discord snowflakes don't fit into a signed integer column.
pub const CREATE_GIVEAWAYS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS giveaways (
        message_id TEXT PRIMARY KEY,
        host_id TEXT NOT NULL,
        channel_id TEXT NOT NULL,
        guild_id TEXT,
        title TEXT NOT NULL,
        winner_target INTEGER NOT NULL,
        duration_seconds INTEGER NOT NULL,
        description TEXT,
        entry_count INTEGER NOT NULL,
        entrants TEXT NOT NULL,
        winners TEXT NOT NULL
    )
"#;

pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        display_name TEXT NOT NULL,
        avatar_url TEXT NOT NULL,
        created_at TEXT,
        joined_at TEXT
    )
"#;

pub const MIGRATIONS: [&str; 2] = [CREATE_GIVEAWAYS_TABLE, CREATE_USERS_TABLE];
