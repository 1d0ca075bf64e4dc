pub mod bot;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod messenger;
#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use poise::serenity_prelude::{Client, GatewayIntents};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::bot::{event_handler, SerenityMessenger};
use crate::commands::giveaway::services::GiveawayServices;
use crate::commands::{get_commands_list, UserData};
use crate::config::Config;
use crate::db::{Database, GiveawayRepository, SqliteGiveawayRepository};
use crate::error::{Error, Result};
use crate::messenger::Messenger;

async fn run() -> Result<()> {
    let config = Arc::new(Config::from_env()?);

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    let repository: Arc<dyn GiveawayRepository> =
        Arc::new(SqliteGiveawayRepository::new(database.pool().clone()));

    let services_config = config.clone();
    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands_list(),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Got command '{}' by user '{}'",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                let messenger: Arc<dyn Messenger> =
                    Arc::new(SerenityMessenger::new(ctx.http.clone()));
                let services = GiveawayServices::new(messenger, repository, services_config);
                Ok(UserData::new(services))
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged();
    let mut client = Client::builder(&config.discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        error!("Client error: {}", err);
        std::process::exit(1);
    }
}
