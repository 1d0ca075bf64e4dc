use std::env;

use crate::error::{Error, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./Database/giveaways.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    // Bot token used for connecting to the Discord gateway
    pub discord_token: String,
    // Public base URL of the summary pages. Summary links are omitted when not set.
    pub public_base_url: Option<String>,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine, the variables can come from the process environment
        dotenv::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| Error::Config("Expected a DISCORD_TOKEN in the environment".to_string()))?;

        Ok(Config {
            discord_token,
            public_base_url: normalize_base_url(env::var("DOMAIN").ok()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        })
    }

    // Returns a link to the public summary page of the finished giveaway.
    pub fn summary_url(&self, message_id: u64) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base_url| format!("{}/{}", base_url, message_id))
    }
}

fn normalize_base_url(value: Option<String>) -> Option<String> {
    value
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
}
