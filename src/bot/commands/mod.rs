use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    model::{application::CommandOptionType, channel::ChannelType, Permissions},
};

use crate::{bot::context::CommandContext, error::CommandResult};

pub mod channels;
pub mod check;
pub mod daily;
pub mod info;
pub mod leaderboard;
pub mod login;
pub mod ping;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Login,
    Check,
    SetDailyProblem,
    SetLeaderboardChannel,
    SetAnnouncementChannel,
    BotInfo,
    Help,
    Leaderboard,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Ping,
        Command::Login,
        Command::Check,
        Command::SetDailyProblem,
        Command::SetLeaderboardChannel,
        Command::SetAnnouncementChannel,
        Command::BotInfo,
        Command::Help,
        Command::Leaderboard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Login => "login",
            Command::Check => "check",
            Command::SetDailyProblem => "setdailyproblem",
            Command::SetLeaderboardChannel => "setleaderboardchannel",
            Command::SetAnnouncementChannel => "setannouncementchannel",
            Command::BotInfo => "botinfo",
            Command::Help => "help",
            Command::Leaderboard => "leaderboard",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Ping => "Check the bot's latency",
            Command::Login => "Link your Codeforces handle",
            Command::Check => "Check whether you solved today's daily problem",
            Command::SetDailyProblem => "Set the daily problem for this server",
            Command::SetLeaderboardChannel => "Set the channel the leaderboard is posted in",
            Command::SetAnnouncementChannel => "Set the channel new daily problems are announced in",
            Command::BotInfo => "Show information about the bot",
            Command::Help => "List the available commands",
            Command::Leaderboard => "Show this server's leaderboard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Commands that change server configuration and need the Manage Server permission.
    pub fn elevated(self) -> bool {
        matches!(
            self,
            Command::SetDailyProblem | Command::SetLeaderboardChannel | Command::SetAnnouncementChannel
        )
    }

    fn guild_only(self) -> bool {
        !matches!(self, Command::Ping | Command::BotInfo | Command::Help)
    }

    pub fn register(self) -> CreateCommand {
        let mut command = CreateCommand::new(self.name())
            .description(self.description())
            .dm_permission(!self.guild_only());

        if self.elevated() {
            command = command.default_member_permissions(Permissions::MANAGE_GUILD);
        }

        match self {
            Command::Login => command.add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "handle",
                    "Your Codeforces handle",
                )
                .required(true),
            ),
            Command::SetDailyProblem => command.add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "problem_url",
                    "Link to the Codeforces problem",
                )
                .required(true),
            ),
            Command::SetLeaderboardChannel | Command::SetAnnouncementChannel => command.add_option(
                CreateCommandOption::new(CommandOptionType::Channel, "channel", "The channel to use")
                    .channel_types(vec![ChannelType::Text, ChannelType::News])
                    .required(true),
            ),
            _ => command,
        }
    }

    pub async fn dispatch(self, ctx: &CommandContext<'_>) -> CommandResult {
        if self.elevated() && !ctx.is_elevated() {
            return ctx
                .send_ephemeral("You need the Manage Server permission to use this command.")
                .await;
        }

        match self {
            Command::Ping => ping::ping(ctx).await,
            Command::Login => login::login(ctx).await,
            Command::Check => check::check(ctx).await,
            Command::SetDailyProblem => daily::set_daily_problem(ctx).await,
            Command::SetLeaderboardChannel => channels::set_leaderboard_channel(ctx).await,
            Command::SetAnnouncementChannel => channels::set_announcement_channel(ctx).await,
            Command::BotInfo => info::botinfo(ctx).await,
            Command::Help => info::help(ctx).await,
            Command::Leaderboard => leaderboard::leaderboard(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_command_resolves_by_name() {
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(command));
        }
        assert_eq!(Command::from_name("stats"), None);
    }

    #[test]
    fn names_are_unique_and_lowercase() {
        let names = Command::ALL.iter().map(|c| c.name()).collect::<HashSet<_>>();

        assert_eq!(names.len(), Command::ALL.len());
        assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase())));
    }

    #[test]
    fn only_configuration_is_elevated() {
        let elevated = Command::ALL
            .iter()
            .filter(|c| c.elevated())
            .map(|c| c.name())
            .collect::<Vec<_>>();

        assert_eq!(elevated, vec![
            "setdailyproblem",
            "setleaderboardchannel",
            "setannouncementchannel"
        ]);
    }
}
