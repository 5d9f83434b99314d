use tracing::{info, warn};

use crate::{
    bot::{
        context::{CommandContext, Reply},
        publisher,
    },
    database::set_daily_problem as store_daily_problem,
    error::CommandResult,
    judge::ProblemId,
};

pub async fn set_daily_problem(ctx: &CommandContext<'_>) -> CommandResult {
    let guild_id = ctx.guild_id()?;
    let url = ctx.get_str_arg("problem_url").unwrap_or_default();

    let problem_id = match ProblemId::from_url(url) {
        Some(id) => id,
        None =>
            return ctx
                .send_ephemeral(format!(
                    "`{}` isn't a Codeforces problem link. It should look like https://codeforces.com/contest/1500/problem/A",
                    url
                ))
                .await,
    };

    ctx.defer(false).await?;

    // No index over the problem set, a linear scan of the full list is fine at this size
    let problems = ctx.state.judge.problems().await?;
    let problem = match problems.into_iter().find(|p| p.is(&problem_id)) {
        Some(p) => p,
        None =>
            return ctx
                .send_str(format!("Codeforces doesn't have a problem {}", problem_id))
                .await,
    };

    let guild = {
        let database = ctx.state.database.lock().await;
        store_daily_problem(&database, guild_id, &problem_id)?
    };
    info!(guild = %guild_id, problem = %problem_id, "daily problem set");

    let notice = match guild.announcement_channel_id() {
        Some(channel) =>
            match publisher::announce_daily_problem(&ctx.ctx.http, channel, &problem, &problem_id)
                .await
            {
                Ok(_) => format!("Announced in <#{}>.", channel),
                Err(why) => {
                    warn!(guild = %guild_id, channel = %channel, "couldn't announce daily problem: {}", why);
                    format!(
                        "Warning: couldn't post the announcement in <#{}>, check my permissions there.",
                        channel
                    )
                }
            },
        None => "No announcement channel is set, use `/setannouncementchannel` to announce new problems."
            .to_owned(),
    };

    // The leaderboard header shows the current problem
    publisher::spawn_refresh(ctx.ctx.http.clone(), ctx.state.clone(), guild_id);

    ctx.send(
        Reply::embed(publisher::problem_embed(&problem, &problem_id))
            .content(format!("Daily problem set to {}. {}", problem_id, notice)),
    )
    .await
}
