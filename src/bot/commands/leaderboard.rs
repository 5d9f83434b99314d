use crate::{
    bot::{context::CommandContext, leaderboard::load_entries, publisher::leaderboard_embed},
    database::get_guild,
    error::CommandResult,
};

pub async fn leaderboard(ctx: &CommandContext<'_>) -> CommandResult {
    let guild_id = ctx.guild_id()?;

    let (guild, entries) = {
        let database = ctx.state.database.lock().await;
        (get_guild(&database, guild_id)?, load_entries(&database, guild_id)?)
    };

    ctx.send_embed(leaderboard_embed(guild.as_ref(), &entries))
        .await
}
