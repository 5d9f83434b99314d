use diesel::{pg::PgConnection, prelude::*, Queryable};
use serenity::model::id::{GuildId, UserId};

use crate::database::{schema::*, DbId};

#[derive(Queryable, Insertable, Clone, Debug, PartialEq, Eq)]
#[table_name = "server_users"]
pub struct GuildMember {
    pub server_id: DbId,
    pub user_id: DbId,
    pub points: i64,
    pub last_submitted: Option<String>,
}

/// What a daily check did to the caller's standing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The daily problem was already counted for this member.
    AlreadySubmitted { points: i64 },
    /// First check in this guild, the member is now on the leaderboard.
    Joined { solved: bool, points: i64 },
    Solved { points: i64 },
    NotSolved { points: i64 },
}

impl CheckOutcome {
    pub fn changed_leaderboard(&self) -> bool {
        matches!(self, CheckOutcome::Joined { .. } | CheckOutcome::Solved { .. })
    }
}

/// Decides the member row after a daily check. Returns the row to write, if any.
///
/// An existing member only earns a point when the daily problem is actually solved.
pub fn next_member_state(
    existing: Option<&GuildMember>,
    server_id: DbId,
    user_id: DbId,
    daily_problem: &str,
    solved: bool,
) -> (CheckOutcome, Option<GuildMember>) {
    match existing {
        Some(member) if member.last_submitted.as_deref() == Some(daily_problem) => (
            CheckOutcome::AlreadySubmitted {
                points: member.points,
            },
            None,
        ),
        Some(member) if solved => {
            let updated = GuildMember {
                points: member.points + 1,
                last_submitted: Some(daily_problem.to_owned()),
                ..member.clone()
            };
            (
                CheckOutcome::Solved {
                    points: updated.points,
                },
                Some(updated),
            )
        }
        Some(member) => (
            CheckOutcome::NotSolved {
                points: member.points,
            },
            None,
        ),
        None => {
            let member = GuildMember {
                server_id,
                user_id,
                points: if solved { 1 } else { 0 },
                last_submitted: if solved {
                    Some(daily_problem.to_owned())
                } else {
                    None
                },
            };
            (
                CheckOutcome::Joined {
                    solved,
                    points: member.points,
                },
                Some(member),
            )
        }
    }
}

/// Applies a daily check for one member. The member row stays locked for the
/// whole read-modify-write so concurrent checks can't lose a point.
pub fn record_check(
    conn: &PgConnection,
    guild_id: GuildId,
    member_id: UserId,
    daily_problem: &str,
    solved: bool,
) -> QueryResult<CheckOutcome> {
    let server = DbId::from(guild_id);
    let user = DbId::from(member_id);

    conn.transaction::<_, diesel::result::Error, _>(|| {
        let existing = server_users::table
            .find((server, user))
            .for_update()
            .first::<GuildMember>(conn)
            .optional()?;

        let (outcome, write) =
            next_member_state(existing.as_ref(), server, user, daily_problem, solved);

        if let Some(member) = write {
            diesel::insert_into(server_users::table)
                .values(&member)
                .on_conflict((server_users::server_id, server_users::user_id))
                .do_update()
                .set((
                    server_users::points.eq(member.points),
                    server_users::last_submitted.eq(member.last_submitted.clone()),
                ))
                .execute(conn)?;
        }

        Ok(outcome)
    })
}

pub fn get_server_leaderboard_by_points(
    conn: &PgConnection,
    guild_id: GuildId,
) -> QueryResult<Vec<GuildMember>> {
    server_users::table
        .filter(server_users::server_id.eq(DbId::from(guild_id)))
        .order(server_users::points.desc())
        .load::<GuildMember>(conn)
}
