#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

use std::sync::Arc;

use anyhow::Context as _;
use bot::{
    handler::Handler,
    state::{BotState, ShardManagerContainer},
};
use config::Config;
use judge::JudgeClient;
use serenity::{model::id::ApplicationId, prelude::GatewayIntents, Client};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod database;
mod error;
mod judge;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("daily_problem_bot=info,serenity=warn")),
        )
        .init();

    let config = Config::from_env().context("Error loading configuration")?;

    let connection = database::establish_connection(&config.database_url)
        .context("Error connecting to the database")?;
    database::run_migrations(&connection).context("Error running database migrations")?;

    let judge = JudgeClient::new(&config.judge_api_url, config.judge_timeout)
        .context("Error building judge client")?;

    let state = Arc::new(BotState::new(
        connection,
        judge,
        config.testing_guilds.clone(),
    ));

    let mut client = Client::builder(&config.discord_token, GatewayIntents::GUILDS)
        .application_id(ApplicationId::new(config.application_id))
        .event_handler(Handler::new(state))
        .await
        .context("Error making client")?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    info!("starting client");
    if let Err(why) = client.start().await {
        error!("Client encountered an error: {:?}", why);
        return Err(why.into());
    }

    Ok(())
}
