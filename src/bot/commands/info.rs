use serenity::{
    builder::{CreateEmbed, CreateEmbedFooter},
    model::Colour,
};

use super::Command;
use crate::{bot::context::CommandContext, error::CommandResult};

const SERENITY_VERSION: &str = "0.12";

pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = total_seconds % 86_400 / 3_600;
    let minutes = total_seconds % 3_600 / 60;
    let seconds = total_seconds % 60;

    format!("{}d, {}h, {}m, {}s", days, hours, minutes, seconds)
}

// Parses the VmRSS line of /proc/self/status, reported in kB
fn parse_resident_memory(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kilobytes = line.split_whitespace().nth(1)?.parse::<u64>().ok()?;
    Some(kilobytes * 1024)
}

fn resident_memory() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_resident_memory(&status)
}

fn format_bytes(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / (1024.0 * 1024.0))
}

pub async fn botinfo(ctx: &CommandContext<'_>) -> CommandResult {
    let cache = &ctx.ctx.cache;
    let guilds = cache.guilds();
    let members: u64 = guilds
        .iter()
        .filter_map(|id| cache.guild(*id).map(|g| g.member_count))
        .sum();

    let uptime = format_uptime(ctx.state.started.elapsed().as_secs());
    let memory = resident_memory().map_or("unknown".to_owned(), format_bytes);
    let current_user = cache.current_user().name.clone();

    ctx.send_embed(
        CreateEmbed::new()
            .title(format!("About {}", current_user))
            .field("Uptime", uptime, true)
            .field("Servers", guilds.len().to_string(), true)
            .field("Members", members.to_string(), true)
            .field("Memory", memory, true)
            .field(
                "Versions",
                format!(
                    "{} {}\nserenity {}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION"),
                    SERENITY_VERSION
                ),
                true,
            )
            .field(
                "Platform",
                format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
                true,
            )
            .colour(Colour::BLURPLE),
    )
    .await
}

pub async fn help(ctx: &CommandContext<'_>) -> CommandResult {
    let mut embed = CreateEmbed::new()
        .title("Commands")
        .description("Solve the daily problem, run `/check`, and climb the leaderboard!")
        .colour(Colour::BLURPLE)
        .footer(CreateEmbedFooter::new(
            "Commands marked with * need the Manage Server permission",
        ));

    for command in Command::ALL {
        embed = embed.field(
            format!(
                "/{}{}",
                command.name(),
                if command.elevated() { " *" } else { "" }
            ),
            command.description(),
            false,
        );
    }

    ctx.send_embed(embed).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_splits_into_units() {
        assert_eq!(format_uptime(90061), "1d, 1h, 1m, 1s");
        assert_eq!(format_uptime(0), "0d, 0h, 0m, 0s");
        assert_eq!(format_uptime(59), "0d, 0h, 0m, 59s");
        assert_eq!(format_uptime(3 * 86_400 + 23 * 3_600), "3d, 23h, 0m, 0s");
    }

    #[test]
    fn resident_memory_reads_vmrss() {
        let status = "Name:\tdaily_problem_bot\nVmPeak:\t  200000 kB\nVmRSS:\t   12288 kB\nThreads:\t8\n";

        assert_eq!(parse_resident_memory(status), Some(12288 * 1024));
        assert_eq!(parse_resident_memory("Name:\tbot\n"), None);
    }

    #[test]
    fn bytes_render_as_mebibytes() {
        assert_eq!(format_bytes(12 * 1024 * 1024), "12.00 MiB");
    }
}
