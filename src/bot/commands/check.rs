use tracing::info;

use crate::{
    bot::{context::CommandContext, publisher},
    database::{get_guild, get_user, record_check, CheckOutcome, GuildRecord},
    error::CommandResult,
    judge::{has_solved, ProblemId},
};

fn outcome_message(outcome: &CheckOutcome, daily: &ProblemId) -> String {
    match outcome {
        CheckOutcome::AlreadySubmitted { points } => format!(
            "You already got credit for {}. You have {} {}.",
            daily,
            points,
            plural(*points)
        ),
        CheckOutcome::Joined { solved: true, points } | CheckOutcome::Solved { points } => format!(
            "Nice work solving {}! You now have {} {}.",
            daily,
            points,
            plural(*points)
        ),
        CheckOutcome::Joined {
            solved: false,
            points,
        } => format!(
            "You're on the leaderboard now, but you haven't solved {} yet. You have {} {}.",
            daily,
            points,
            plural(*points)
        ),
        CheckOutcome::NotSolved { points } => format!(
            "You haven't solved {} yet. You have {} {}.",
            daily,
            points,
            plural(*points)
        ),
    }
}

fn plural(points: i64) -> &'static str {
    if points == 1 {
        "point"
    } else {
        "points"
    }
}

pub async fn check(ctx: &CommandContext<'_>) -> CommandResult {
    let guild_id = ctx.guild_id()?;
    let author = ctx.author().id;

    ctx.defer(false).await?;

    let (user, guild) = {
        let database = ctx.state.database.lock().await;
        (get_user(&database, author, guild_id)?, get_guild(&database, guild_id)?)
    };

    let user = match user {
        Some(u) => u,
        None =>
            return ctx
                .send_str("You haven't linked a Codeforces handle yet, use `/login` first.")
                .await,
    };
    let daily = match guild.as_ref().and_then(GuildRecord::daily_problem_id) {
        Some(d) => d,
        None =>
            return ctx
                .send_str("There's no daily problem set for this server yet.")
                .await,
    };

    let submissions = ctx.state.judge.user_submissions(&user.handle, None).await?;
    let solved = has_solved(&submissions, &daily);

    let outcome = {
        let database = ctx.state.database.lock().await;
        record_check(&database, guild_id, author, &daily.to_string(), solved)?
    };
    info!(guild = %guild_id, user = %author, handle = %user.handle, ?outcome, "daily check");

    // The reply doesn't wait on the leaderboard message
    if outcome.changed_leaderboard() {
        publisher::spawn_refresh(ctx.ctx.http.clone(), ctx.state.clone(), guild_id);
    }

    ctx.send_str(outcome_message(&outcome, &daily)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_reflect_outcome() {
        let daily = ProblemId::new(1500, "A");

        assert_eq!(
            outcome_message(&CheckOutcome::Solved { points: 1 }, &daily),
            "Nice work solving 1500/A! You now have 1 point."
        );
        assert_eq!(
            outcome_message(&CheckOutcome::AlreadySubmitted { points: 3 }, &daily),
            "You already got credit for 1500/A. You have 3 points."
        );
        assert!(outcome_message(
            &CheckOutcome::Joined {
                solved: false,
                points: 0
            },
            &daily
        )
        .contains("haven't solved 1500/A"));
    }
}
