use std::{collections::HashMap, sync::Arc, time::Instant};

use diesel::PgConnection;
use serenity::{
    futures::lock::Mutex,
    gateway::ShardManager,
    model::id::GuildId,
    prelude::TypeMapKey,
};

use crate::{database::DatabaseConn, judge::JudgeClient};

/// Services shared by every handler. Built once in main and handed to the event handler.
pub struct BotState {
    pub database: DatabaseConn,
    pub judge: JudgeClient,
    pub started: Instant,
    pub testing_guilds: Vec<GuildId>,
    pub refresh_locks: RefreshLocks,
}

impl BotState {
    pub fn new(connection: PgConnection, judge: JudgeClient, testing_guilds: Vec<GuildId>) -> Self {
        BotState {
            database: Arc::new(Mutex::new(connection)),
            judge,
            started: Instant::now(),
            testing_guilds,
            refresh_locks: RefreshLocks::default(),
        }
    }
}

/// One lock per guild, held for a whole leaderboard refresh so two refreshes of
/// the same guild never both post a new message.
#[derive(Default)]
pub struct RefreshLocks {
    guilds: Mutex<HashMap<GuildId, Arc<Mutex<()>>>>,
}

impl RefreshLocks {
    pub async fn for_guild(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.guilds
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .clone()
    }
}

// The shard manager only exists once the client is built, so it goes in the client's data map
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refreshes_of_one_guild_are_serialized() {
        let locks = RefreshLocks::default();
        let guild = GuildId::new(1);

        let first = locks.for_guild(guild).await;
        let _refreshing = first.lock().await;

        assert!(Arc::ptr_eq(&first, &locks.for_guild(guild).await));
        assert!(locks.for_guild(guild).await.try_lock().is_none());
    }

    #[tokio::test]
    async fn other_guilds_refresh_independently() {
        let locks = RefreshLocks::default();

        let first = locks.for_guild(GuildId::new(1)).await;
        let _refreshing = first.lock().await;

        assert!(locks.for_guild(GuildId::new(2)).await.try_lock().is_some());
    }
}
