use rand::seq::IteratorRandom;
use serenity::{
    builder::{
        CreateActionRow,
        CreateButton,
        CreateEmbed,
        CreateInteractionResponse,
        CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
    client::Context,
    model::{application::ButtonStyle, application::ComponentInteraction, id::UserId, Colour},
};
use tracing::{debug, info, warn};

use crate::{
    bot::{
        context::{CommandContext, Reply},
        state::BotState,
    },
    database::save_user,
    error::{BotError, CommandResult},
    judge::{confirms_login, JudgeError, ProblemId},
};

pub const LOGIN_PREFIX: &str = "login";

/// Everything the confirm button needs to finish a login, carried in its custom id
/// as `login:<user>:<handle>:<contestId>/<index>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginToken {
    pub user: UserId,
    pub handle: String,
    pub problem: ProblemId,
}

impl LoginToken {
    pub fn custom_id(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            LOGIN_PREFIX, self.user, self.handle, self.problem
        )
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.splitn(4, ':');
        if parts.next()? != LOGIN_PREFIX {
            return None;
        }

        let user = parts.next()?.parse::<u64>().ok().filter(|id| *id != 0)?;
        let handle = parts.next()?;
        if !is_valid_handle(handle) {
            return None;
        }
        let problem = parts.next()?.parse().ok()?;

        Some(LoginToken {
            user: UserId::new(user),
            handle: handle.to_owned(),
            problem,
        })
    }
}

// Codeforces handles are 3 to 24 latin letters, digits, underscores, dashes or dots
pub fn is_valid_handle(handle: &str) -> bool {
    (3 ..= 24).contains(&handle.len())
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub async fn login(ctx: &CommandContext<'_>) -> CommandResult {
    ctx.guild_id()?;
    let handle = ctx.get_str_arg("handle").unwrap_or_default().trim();

    if !is_valid_handle(handle) {
        return ctx
            .send_ephemeral(format!("`{}` isn't a valid Codeforces handle", handle))
            .await;
    }

    ctx.defer(true).await?;

    let account = match ctx.state.judge.user_info(handle).await {
        Ok(account) => account,
        Err(JudgeError::Failed(comment)) => {
            debug!(handle, "handle lookup failed: {}", comment);
            return ctx
                .send_str(format!("Codeforces doesn't know a user called `{}`", handle))
                .await;
        }
        Err(why) => return Err(why.into()),
    };

    let problems = ctx.state.judge.problems().await?;
    let picked = problems
        .into_iter()
        .filter_map(|p| p.id().map(|id| (id, p)))
        .choose(&mut rand::thread_rng());

    let (problem_id, problem) = match picked {
        Some(p) => p,
        None =>
            return ctx
                .send_str("Codeforces didn't return any problems, try again later")
                .await,
    };

    let token = LoginToken {
        user: ctx.author().id,
        handle: account.handle.clone(),
        problem: problem_id.clone(),
    };

    let embed = CreateEmbed::new()
        .title(format!("Verify {}", account.handle))
        .description(format!(
            "To prove you own **{}**, submit code that fails to compile to [{} - {}]({}) and then press **Confirm**.\n\n\
             Only your most recent submission is checked, so don't submit anything else in between.",
            account.handle,
            problem_id,
            problem.name,
            problem_id.url()
        ))
        .colour(Colour::BLURPLE);

    let confirm = CreateButton::new(token.custom_id())
        .label("Confirm")
        .style(ButtonStyle::Success);

    ctx.send(Reply::embed(embed).components(vec![CreateActionRow::Buttons(vec![confirm])]))
        .await
}

async fn respond_ephemeral(
    ctx: &Context,
    component: &ComponentInteraction,
    content: &str,
) -> CommandResult {
    component
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

/// Handles a press of the confirm button sent by `/login`.
pub async fn confirm(
    ctx: &Context,
    state: &BotState,
    component: &ComponentInteraction,
) -> CommandResult {
    let token = match LoginToken::parse(&component.data.custom_id) {
        Some(t) => t,
        None =>
            return respond_ephemeral(
                ctx,
                component,
                "This login prompt is no longer valid, run `/login` again.",
            )
            .await,
    };

    if token.user != component.user.id {
        return respond_ephemeral(ctx, component, "This login prompt belongs to someone else.")
            .await;
    }

    let guild_id = component.guild_id.ok_or(BotError::GuildOnly)?;

    component
        .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
        .await?;

    // A failed lookup counts as a rejection, the user has to start over either way
    let latest = match state.judge.latest_submission(&token.handle).await {
        Ok(latest) => latest,
        Err(why) => {
            warn!(handle = %token.handle, "couldn't fetch latest submission: {}", why);
            None
        }
    };
    let verified = latest
        .as_ref()
        .map_or(false, |s| confirms_login(s, &token.problem));

    let content = if verified {
        {
            let database = state.database.lock().await;
            save_user(&database, token.user, guild_id, &token.handle)?;
        }
        info!(guild = %guild_id, user = %token.user, handle = %token.handle, "handle linked");

        format!("Linked Codeforces handle **{}** to your account.", token.handle)
    } else {
        info!(guild = %guild_id, user = %token.user, handle = %token.handle, "login rejected");

        format!(
            "Couldn't verify **{}**. Your latest submission has to be a compilation error on {}. Run `/login` again to get a new problem.",
            token.handle, token.problem
        )
    };

    component
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .content(content)
                .embeds(Vec::new())
                .components(Vec::new()),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> LoginToken {
        LoginToken {
            user: UserId::new(80351110224678912),
            handle: "abc".to_owned(),
            problem: ProblemId::new(100, "A"),
        }
    }

    #[test]
    fn custom_id_layout() {
        assert_eq!(token().custom_id(), "login:80351110224678912:abc:100/A");
        assert_eq!(
            LoginToken::parse("login:80351110224678912:abc:100/A"),
            Some(token())
        );
    }

    #[test]
    fn malformed_custom_ids_are_rejected() {
        assert_eq!(LoginToken::parse("check:1:abc:100/A"), None);
        assert_eq!(LoginToken::parse("login:0:abc:100/A"), None);
        assert_eq!(LoginToken::parse("login:1:abc"), None);
        assert_eq!(LoginToken::parse("login:1:a:100/A"), None);
        assert_eq!(LoginToken::parse("login:1:abc:100"), None);
    }

    #[test]
    fn handles_are_validated() {
        assert!(is_valid_handle("tourist"));
        assert!(is_valid_handle("Um_nik"));
        assert!(is_valid_handle("a.b-c"));
        assert!(!is_valid_handle("ab"));
        assert!(!is_valid_handle("has space"));
        assert!(!is_valid_handle("colon:handle"));
        assert!(!is_valid_handle(&"x".repeat(25)));
    }
}
