pub mod ids;
pub mod models;
pub mod repository;
pub mod schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::db::schema::MIGRATIONS;
use crate::error::{Error, Result};

pub use crate::db::repository::{GiveawayRepository, SqliteGiveawayRepository};

const MAX_CONNECTIONS: u32 = 5;

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // Opens the database, creating the file and its directory when missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    Error::Database(format!(
                        "Can't create the database directory: {}",
                        err
                    ))
                })?;
            }
        }

        info!("Connecting to SQLite database at: {}", database_url);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Database { pool })
    }

    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Database { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database tables are ready.");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

// A fresh in-memory database with the tables created. A single connection
// keeps every query on the same memory database.
#[cfg(test)]
pub async fn get_test_database() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let database = Database::from_pool(pool);
    database.migrate().await.unwrap();
    database
}
