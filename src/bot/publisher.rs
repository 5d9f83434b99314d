use std::sync::Arc;

use serenity::{
    builder::{CreateEmbed, CreateMessage, EditMessage},
    http::Http,
    model::{
        channel::Message,
        id::{ChannelId, GuildId},
        Colour,
        Timestamp,
    },
};
use tracing::{debug, info, warn};

use crate::{
    bot::{
        leaderboard::{self, LeaderboardEntry},
        state::BotState,
        tasks,
    },
    database::{get_guild, set_leaderboard_message, GuildRecord},
    error::{is_unknown_message, BotError},
    judge::{Problem, ProblemId},
};

pub fn leaderboard_embed(guild: Option<&GuildRecord>, entries: &[LeaderboardEntry]) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("Leaderboard")
        .description(leaderboard::render(entries))
        .colour(Colour::GOLD)
        .timestamp(Timestamp::now());

    if let Some(problem) = guild.and_then(GuildRecord::daily_problem_id) {
        embed = embed.field(
            "Daily problem",
            format!("[{}]({})", problem, problem.url()),
            false,
        );
    }

    embed
}

pub fn problem_embed(problem: &Problem, id: &ProblemId) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(format!("{} - {}", id, problem.name))
        .url(id.url())
        .colour(Colour::BLURPLE);

    if let Some(rating) = problem.rating {
        embed = embed.field("Rating", rating.to_string(), true);
    }
    if !problem.tags.is_empty() {
        embed = embed.field("Tags", problem.tags.join(", "), true);
    }

    embed
}

pub async fn announce_daily_problem(
    http: &Http,
    channel: ChannelId,
    problem: &Problem,
    id: &ProblemId,
) -> Result<Message, serenity::Error> {
    channel
        .send_message(
            http,
            CreateMessage::new()
                .content("A new daily problem is up! Solve it and run `/check` to earn a point.")
                .embed(problem_embed(problem, id)),
        )
        .await
}

/// Brings the guild's leaderboard message up to date, posting and pinning a new
/// one when there is none yet or the old one was deleted.
pub async fn refresh_leaderboard(
    http: Arc<Http>,
    state: Arc<BotState>,
    guild_id: GuildId,
) -> Result<(), BotError> {
    // Held until the new message id is stored
    let refresh_lock = state.refresh_locks.for_guild(guild_id).await;
    let _refreshing = refresh_lock.lock().await;

    let (guild, entries) = {
        let database = state.database.lock().await;
        let guild = match get_guild(&database, guild_id)? {
            Some(g) => g,
            None => return Ok(()),
        };
        let entries = leaderboard::load_entries(&database, guild_id)?;
        (guild, entries)
    };

    let channel = match guild.leaderboard_channel_id() {
        Some(c) => c,
        None => {
            debug!(guild = %guild_id, "no leaderboard channel, skipping refresh");
            return Ok(());
        }
    };

    let embed = leaderboard_embed(Some(&guild), &entries);

    if let Some(message_id) = guild.leaderboard_message_id() {
        match channel
            .edit_message(&*http, message_id, EditMessage::new().embed(embed.clone()))
            .await
        {
            Ok(_) => return Ok(()),
            Err(why) if is_unknown_message(&why) => {
                info!(guild = %guild_id, "leaderboard message was deleted, posting a new one")
            }
            Err(why) => return Err(why.into()),
        }
    }

    let message = channel
        .send_message(&*http, CreateMessage::new().embed(embed))
        .await?;

    if let Err(why) = message.pin(&*http).await {
        warn!(guild = %guild_id, "couldn't pin leaderboard message: {}", why);
    }

    let database = state.database.lock().await;
    set_leaderboard_message(&database, guild_id, Some(message.id))?;

    Ok(())
}

pub fn spawn_refresh(http: Arc<Http>, state: Arc<BotState>, guild_id: GuildId) {
    tasks::spawn_logged(
        "leaderboard refresh",
        refresh_leaderboard(http, state, guild_id),
    );
}
