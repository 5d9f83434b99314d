use std::collections::HashSet;

use diesel::{pg::PgConnection, QueryResult};
use serenity::model::id::{GuildId, UserId};

use crate::database::{get_guild_users, get_server_leaderboard_by_points};

pub const EMPTY_LEADERBOARD: &str = "Nobody has checked in yet. Use `/check` once you've solved the daily problem!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    // None when the member no longer has a linked handle
    pub user: Option<UserId>,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub user: UserId,
    pub points: i64,
}

pub fn load_entries(conn: &PgConnection, guild_id: GuildId) -> QueryResult<Vec<LeaderboardEntry>> {
    let members = get_server_leaderboard_by_points(conn, guild_id)?;
    let linked = get_guild_users(conn, guild_id)?
        .into_iter()
        .map(|u| u.id)
        .collect::<HashSet<_>>();

    Ok(members
        .into_iter()
        .map(|m| LeaderboardEntry {
            user: if linked.contains(&m.user_id) {
                Some(m.user_id.into())
            } else {
                None
            },
            points: m.points,
        })
        .collect())
}

/// Sorts by points and assigns competition ranks: tied members share a rank and
/// the next distinct score skips ahead, so `[10, 10, 5]` ranks as `[1, 1, 3]`.
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<RankedEntry> {
    let mut resolved = entries
        .iter()
        .filter_map(|e| e.user.map(|user| (user, e.points)))
        .collect::<Vec<_>>();
    resolved.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(resolved.len());
    for (position, (user, points)) in resolved.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(previous) if previous.points == points => previous.rank,
            _ => position + 1,
        };
        ranked.push(RankedEntry { rank, user, points });
    }

    ranked
}

// Discord rejects embed descriptions longer than this
pub const DESCRIPTION_LIMIT: usize = 4096;

fn line(entry: &RankedEntry) -> String {
    format!(
        "{}. <@{}> - {} {}",
        entry.rank,
        entry.user,
        entry.points,
        if entry.points == 1 { "point" } else { "points" }
    )
}

fn overflow_line(hidden: usize) -> String {
    format!("...and {} more", hidden)
}

pub fn render(entries: &[LeaderboardEntry]) -> String {
    render_within(entries, DESCRIPTION_LIMIT)
}

/// Renders as many ranked lines as fit in `limit` bytes. The lowest ranks are
/// cut first and replaced by a count of the members left out.
fn render_within(entries: &[LeaderboardEntry], limit: usize) -> String {
    let ranked = rank(entries);

    if ranked.is_empty() {
        return EMPTY_LEADERBOARD.to_owned();
    }

    let mut rendered = String::new();
    for (shown, entry) in ranked.iter().enumerate() {
        let line = line(entry);
        let separator = usize::from(!rendered.is_empty());
        let hidden_after = ranked.len() - shown - 1;
        // Room for the overflow line has to stay free while lines are still left over
        let reserve = if hidden_after > 0 {
            overflow_line(hidden_after).len() + 1
        } else {
            0
        };

        if rendered.len() + separator + line.len() + reserve > limit {
            if separator == 1 {
                rendered.push('\n');
            }
            rendered.push_str(&overflow_line(ranked.len() - shown));
            break;
        }

        if separator == 1 {
            rendered.push('\n');
        }
        rendered.push_str(&line);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: u64, points: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            user: Some(UserId::new(user)),
            points,
        }
    }

    fn ranks(entries: &[LeaderboardEntry]) -> Vec<usize> {
        rank(entries).iter().map(|e| e.rank).collect()
    }

    #[test]
    fn distinct_points_rank_in_order() {
        let entries = vec![entry(1, 3), entry(2, 9), entry(3, 5)];

        assert_eq!(ranks(&entries), vec![1, 2, 3]);
        assert_eq!(render(&entries), render(&entries));
        assert_eq!(
            render(&entries),
            "1. <@2> - 9 points\n2. <@3> - 5 points\n3. <@1> - 3 points"
        );
    }

    #[test]
    fn ties_share_rank_and_skip() {
        let entries = vec![entry(1, 10), entry(2, 10), entry(3, 5)];
        assert_eq!(ranks(&entries), vec![1, 1, 3]);

        let entries = vec![entry(1, 7), entry(2, 4), entry(3, 4), entry(4, 4), entry(5, 1)];
        assert_eq!(ranks(&entries), vec![1, 2, 2, 2, 5]);
    }

    #[test]
    fn unresolved_members_are_skipped() {
        let entries = vec![
            entry(1, 8),
            LeaderboardEntry {
                user: None,
                points: 20,
            },
            entry(2, 1),
        ];

        assert_eq!(render(&entries), "1. <@1> - 8 points\n2. <@2> - 1 point");
    }

    #[test]
    fn empty_board_has_placeholder() {
        assert_eq!(render(&[]), EMPTY_LEADERBOARD);
        assert_eq!(
            render(&[LeaderboardEntry {
                user: None,
                points: 3
            }]),
            EMPTY_LEADERBOARD
        );
    }

    #[test]
    fn zero_points_are_plural() {
        assert_eq!(render(&[entry(5, 0)]), "1. <@5> - 0 points");
    }

    #[test]
    fn large_boards_fit_in_an_embed() {
        let entries = (0 .. 120)
            .map(|i| entry(100_000_000_000_000_000 + i, 100 + i as i64))
            .collect::<Vec<_>>();

        let rendered = render(&entries);
        assert!(rendered.len() <= DESCRIPTION_LIMIT, "{} bytes", rendered.len());

        let lines = rendered.lines().collect::<Vec<_>>();
        let shown = lines.len() - 1;
        assert_eq!(lines[0], "1. <@100000000000000119> - 219 points");
        assert_eq!(*lines.last().unwrap(), format!("...and {} more", 120 - shown));
    }

    #[test]
    fn lowest_ranks_are_cut_first() {
        let entries = vec![entry(1, 3), entry(2, 2), entry(3, 1)];
        let full = render(&entries);
        assert_eq!(render_within(&entries, full.len()), full);

        // "1. <@1> - 3 points" plus room for "...and 2 more"
        assert_eq!(render_within(&entries, 32), "1. <@1> - 3 points\n...and 2 more");
        assert_eq!(render_within(&entries, 31), "...and 3 more");
    }
}
