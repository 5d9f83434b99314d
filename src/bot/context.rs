use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use serenity::{
    builder::{
        CreateActionRow,
        CreateEmbed,
        CreateInteractionResponse,
        CreateInteractionResponseFollowup,
        CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
    client::Context,
    model::{
        application::{CommandDataOptionValue, CommandInteraction},
        id::{ChannelId, GuildId},
        user::User,
        Colour,
    },
};

use crate::{
    bot::state::BotState,
    error::{BotError, CommandResult},
};

const NOT_RESPONDED: u8 = 0;
const DEFERRED: u8 = 1;
const RESPONDED: u8 = 2;
const DEFERRED_EPHEMERAL: u8 = 3;

#[derive(Debug, PartialEq, Eq)]
enum ErrorDelivery {
    Respond,
    // A public "thinking" message is showing. It is removed and the error goes
    // out as a private followup instead.
    Followup,
    Skip,
}

fn error_delivery(response: u8) -> ErrorDelivery {
    match response {
        RESPONDED => ErrorDelivery::Skip,
        DEFERRED => ErrorDelivery::Followup,
        _ => ErrorDelivery::Respond,
    }
}

/// A message sent back for an interaction. Turned into either a fresh response
/// or an edit of the existing one, depending on what was already sent.
#[derive(Clone, Default)]
pub struct Reply {
    content: Option<String>,
    embed: Option<CreateEmbed>,
    components: Option<Vec<CreateActionRow>>,
    ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: CreateEmbed) -> Self {
        Reply {
            embed: Some(embed),
            ..Default::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn components(mut self, components: Vec<CreateActionRow>) -> Self {
        self.components = Some(components);
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    fn into_message(self) -> CreateInteractionResponseMessage {
        let mut message = CreateInteractionResponseMessage::new().ephemeral(self.ephemeral);
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some(embed) = self.embed {
            message = message.embed(embed);
        }
        if let Some(components) = self.components {
            message = message.components(components);
        }
        message
    }

    // Ephemerality can't change after the first response so it is dropped here
    fn into_edit(self) -> EditInteractionResponse {
        let mut edit = EditInteractionResponse::new();
        if let Some(content) = self.content {
            edit = edit.content(content);
        }
        if let Some(embed) = self.embed {
            edit = edit.embed(embed);
        }
        if let Some(components) = self.components {
            edit = edit.components(components);
        }
        edit
    }
}

pub fn error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Something went wrong")
        .description(message)
        .colour(Colour::RED)
}

pub struct CommandContext<'a> {
    pub ctx: &'a Context,
    pub interaction: &'a CommandInteraction,
    pub state: &'a Arc<BotState>,
    response: AtomicU8,
}

impl<'a> CommandContext<'a> {
    pub fn new(ctx: &'a Context, interaction: &'a CommandInteraction, state: &'a Arc<BotState>) -> Self {
        CommandContext {
            ctx,
            interaction,
            state,
            response: AtomicU8::new(NOT_RESPONDED),
        }
    }

    pub fn guild_id(&self) -> Result<GuildId, BotError> {
        self.interaction.guild_id.ok_or(BotError::GuildOnly)
    }

    pub fn author(&self) -> &User {
        &self.interaction.user
    }

    fn arg(&self, name: &str) -> Option<&CommandDataOptionValue> {
        self.interaction
            .data
            .options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    pub fn get_str_arg(&self, name: &str) -> Option<&str> {
        match self.arg(name) {
            Some(CommandDataOptionValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_channel_arg(&self, name: &str) -> Option<ChannelId> {
        match self.arg(name) {
            Some(CommandDataOptionValue::Channel(c)) => Some(*c),
            _ => None,
        }
    }

    /// Whether the caller may change the server's configuration.
    pub fn is_elevated(&self) -> bool {
        self.interaction
            .member
            .as_ref()
            .and_then(|m| m.permissions)
            .map_or(false, |p| p.administrator() || p.manage_guild())
    }

    /// Acknowledges the interaction so slow work doesn't run into Discord's three second window.
    pub async fn defer(&self, ephemeral: bool) -> CommandResult {
        if self.response.load(Ordering::SeqCst) != NOT_RESPONDED {
            return Ok(());
        }

        self.interaction
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Defer(
                    CreateInteractionResponseMessage::new().ephemeral(ephemeral),
                ),
            )
            .await?;
        self.response.store(
            if ephemeral { DEFERRED_EPHEMERAL } else { DEFERRED },
            Ordering::SeqCst,
        );

        Ok(())
    }

    /// Sends `reply`, or replaces what was already sent for this interaction.
    pub async fn send(&self, reply: Reply) -> CommandResult {
        if self.response.load(Ordering::SeqCst) == NOT_RESPONDED {
            self.interaction
                .create_response(
                    &self.ctx.http,
                    CreateInteractionResponse::Message(reply.into_message()),
                )
                .await?;
        } else {
            self.interaction
                .edit_response(&self.ctx.http, reply.into_edit())
                .await?;
        }
        self.response.store(RESPONDED, Ordering::SeqCst);

        Ok(())
    }

    pub async fn send_str(&self, content: impl Into<String>) -> CommandResult {
        self.send(Reply::text(content)).await
    }

    pub async fn send_ephemeral(&self, content: impl Into<String>) -> CommandResult {
        self.send(Reply::text(content).ephemeral()).await
    }

    pub async fn send_embed(&self, embed: CreateEmbed) -> CommandResult {
        self.send(Reply::embed(embed)).await
    }

    /// Privately tells the user a command failed, unless a real answer already went out.
    pub async fn report_error(&self, error: &BotError) -> CommandResult {
        let embed = error_embed(error.user_message());

        match error_delivery(self.response.load(Ordering::SeqCst)) {
            ErrorDelivery::Skip => Ok(()),
            ErrorDelivery::Respond => self.send(Reply::embed(embed).ephemeral()).await,
            ErrorDelivery::Followup => {
                self.interaction.delete_response(&self.ctx.http).await?;
                self.interaction
                    .create_followup(
                        &self.ctx.http,
                        CreateInteractionResponseFollowup::new()
                            .embed(embed)
                            .ephemeral(true),
                    )
                    .await?;
                self.response.store(RESPONDED, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_after_a_public_defer_go_to_a_private_followup() {
        assert_eq!(error_delivery(DEFERRED), ErrorDelivery::Followup);
    }

    #[test]
    fn errors_are_sent_privately_until_answered() {
        assert_eq!(error_delivery(NOT_RESPONDED), ErrorDelivery::Respond);
        assert_eq!(error_delivery(DEFERRED_EPHEMERAL), ErrorDelivery::Respond);
        assert_eq!(error_delivery(RESPONDED), ErrorDelivery::Skip);
    }

    #[test]
    fn error_embed_is_red() {
        let embed = serde_json::to_value(error_embed("nope")).unwrap();

        assert_eq!(embed["color"], Colour::RED.0);
        assert_eq!(embed["description"], "nope");
    }
}
