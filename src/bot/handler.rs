use std::sync::Arc;

use serenity::{
    async_trait,
    builder::CreateInteractionResponseFollowup,
    client::{Context, EventHandler},
    model::{
        application::{Command as ApplicationCommand, CommandInteraction, ComponentInteraction, Interaction},
        gateway::Ready,
    },
};
use tracing::{debug, error, info, warn};

use crate::bot::{
    commands::{login, Command},
    context::CommandContext,
    state::BotState,
};

pub struct Handler {
    state: Arc<BotState>,
}

impl Handler {
    pub fn new(state: Arc<BotState>) -> Self {
        Handler { state }
    }

    async fn run_command(&self, ctx: &Context, interaction: &CommandInteraction) {
        let command = match Command::from_name(&interaction.data.name) {
            Some(c) => c,
            None => {
                warn!(name = %interaction.data.name, "received unknown command");
                return;
            }
        };

        debug!(
            command = command.name(),
            user = %interaction.user.id,
            guild = ?interaction.guild_id,
            "running command"
        );

        let context = CommandContext::new(ctx, interaction, &self.state);
        let why = match command.dispatch(&context).await {
            Ok(()) => return,
            Err(why) => why,
        };

        if why.is_expired_interaction() {
            warn!(command = command.name(), "interaction expired before we could answer: {}", why);
            return;
        }

        error!(command = command.name(), "command failed: {}", why);

        if let Err(report) = context.report_error(&why).await {
            if report.is_expired_interaction() {
                warn!(command = command.name(), "interaction expired before the error could be reported");
            } else {
                error!(command = command.name(), "couldn't report error: {}", report);
            }
        }
    }

    async fn run_component(&self, ctx: &Context, component: &ComponentInteraction) {
        if !component.data.custom_id.starts_with(login::LOGIN_PREFIX) {
            debug!(custom_id = %component.data.custom_id, "ignoring unknown component");
            return;
        }

        let why = match login::confirm(ctx, &self.state, component).await {
            Ok(()) => return,
            Err(why) => why,
        };

        if why.is_expired_interaction() {
            warn!("login confirmation expired before we could answer: {}", why);
            return;
        }

        error!("login confirmation failed: {}", why);

        let followup = CreateInteractionResponseFollowup::new()
            .content(why.user_message())
            .ephemeral(true);
        if let Err(report) = component.create_followup(&ctx.http, followup).await {
            warn!("couldn't report login error: {}", report);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected to {} guilds", ready.user.name, ready.guilds.len());

        let commands = Command::ALL
            .iter()
            .map(|c| c.register())
            .collect::<Vec<_>>();

        if self.state.testing_guilds.is_empty() {
            match ApplicationCommand::set_global_commands(&ctx.http, commands).await {
                Ok(registered) => info!("registered {} global commands", registered.len()),
                Err(why) => error!("couldn't register global commands: {}", why),
            }
        } else {
            for guild in &self.state.testing_guilds {
                match guild.set_commands(&ctx.http, commands.clone()).await {
                    Ok(registered) => info!(guild = %guild, "registered {} commands", registered.len()),
                    Err(why) => error!(guild = %guild, "couldn't register commands: {}", why),
                }
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.run_command(&ctx, &command).await,
            Interaction::Component(component) => self.run_component(&ctx, &component).await,
            _ => {}
        }
    }
}
