use tracing::info;

use crate::{
    bot::{context::CommandContext, publisher},
    database,
    error::CommandResult,
};

pub async fn set_leaderboard_channel(ctx: &CommandContext<'_>) -> CommandResult {
    let guild_id = ctx.guild_id()?;
    let channel = match ctx.get_channel_arg("channel") {
        Some(c) => c,
        None => return ctx.send_ephemeral("You need to pick a channel").await,
    };

    {
        let conn = ctx.state.database.lock().await;
        database::set_leaderboard_channel(&conn, guild_id, channel)?;
    }
    info!(guild = %guild_id, channel = %channel, "leaderboard channel set");

    // Post the leaderboard right away instead of waiting for the next check
    publisher::spawn_refresh(ctx.ctx.http.clone(), ctx.state.clone(), guild_id);

    ctx.send_str(format!("The leaderboard will be kept in <#{}>", channel))
        .await
}

pub async fn set_announcement_channel(ctx: &CommandContext<'_>) -> CommandResult {
    let guild_id = ctx.guild_id()?;
    let channel = match ctx.get_channel_arg("channel") {
        Some(c) => c,
        None => return ctx.send_ephemeral("You need to pick a channel").await,
    };

    {
        let conn = ctx.state.database.lock().await;
        database::set_announcement_channel(&conn, guild_id, channel)?;
    }
    info!(guild = %guild_id, channel = %channel, "announcement channel set");

    ctx.send_str(format!("New daily problems will be announced in <#{}>", channel))
        .await
}
