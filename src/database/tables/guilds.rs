use diesel::{pg::PgConnection, prelude::*, Queryable};
use serenity::model::id::{ChannelId, GuildId, MessageId};

use crate::{
    database::{schema::*, DbId},
    judge::ProblemId,
};

#[derive(Queryable, Clone, Debug)]
pub struct GuildRecord {
    pub id: DbId,
    pub daily_problem: Option<String>,
    pub leaderboard_channel: Option<DbId>,
    pub announcement_channel: Option<DbId>,
    pub leaderboard_message: Option<DbId>,
}

impl GuildRecord {
    pub fn daily_problem_id(&self) -> Option<ProblemId> {
        self.daily_problem.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn leaderboard_channel_id(&self) -> Option<ChannelId> {
        self.leaderboard_channel.map(Into::into)
    }

    pub fn announcement_channel_id(&self) -> Option<ChannelId> {
        self.announcement_channel.map(Into::into)
    }

    pub fn leaderboard_message_id(&self) -> Option<MessageId> {
        self.leaderboard_message.map(Into::into)
    }
}

pub fn get_guild(conn: &PgConnection, guild_id: GuildId) -> QueryResult<Option<GuildRecord>> {
    guilds::table
        .find(DbId::from(guild_id))
        .first::<GuildRecord>(conn)
        .optional()
}

pub fn set_daily_problem(
    conn: &PgConnection,
    guild_id: GuildId,
    problem: &ProblemId,
) -> QueryResult<GuildRecord> {
    let problem = Some(problem.to_string());

    diesel::insert_into(guilds::table)
        .values((
            guilds::id.eq(DbId::from(guild_id)),
            guilds::daily_problem.eq(problem.clone()),
        ))
        .on_conflict(guilds::id)
        .do_update()
        .set(guilds::daily_problem.eq(problem))
        .get_result(conn)
}

// Moving the leaderboard forgets the old message so a new one gets posted in the new channel
pub fn set_leaderboard_channel(
    conn: &PgConnection,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> QueryResult<GuildRecord> {
    let channel = Some(DbId::from(channel_id));

    diesel::insert_into(guilds::table)
        .values((
            guilds::id.eq(DbId::from(guild_id)),
            guilds::leaderboard_channel.eq(channel),
        ))
        .on_conflict(guilds::id)
        .do_update()
        .set((
            guilds::leaderboard_channel.eq(channel),
            guilds::leaderboard_message.eq(None::<DbId>),
        ))
        .get_result(conn)
}

pub fn set_announcement_channel(
    conn: &PgConnection,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> QueryResult<GuildRecord> {
    let channel = Some(DbId::from(channel_id));

    diesel::insert_into(guilds::table)
        .values((
            guilds::id.eq(DbId::from(guild_id)),
            guilds::announcement_channel.eq(channel),
        ))
        .on_conflict(guilds::id)
        .do_update()
        .set(guilds::announcement_channel.eq(channel))
        .get_result(conn)
}

pub fn set_leaderboard_message(
    conn: &PgConnection,
    guild_id: GuildId,
    message_id: Option<MessageId>,
) -> QueryResult<()> {
    diesel::update(guilds::table.find(DbId::from(guild_id)))
        .set(guilds::leaderboard_message.eq(message_id.map(DbId::from)))
        .execute(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(daily_problem: Option<&str>) -> GuildRecord {
        GuildRecord {
            id: DbId(1),
            daily_problem: daily_problem.map(str::to_owned),
            leaderboard_channel: Some(DbId(20)),
            announcement_channel: None,
            leaderboard_message: None,
        }
    }

    #[test]
    fn stored_daily_problem_is_parsed() {
        assert_eq!(
            record(Some("1500/A")).daily_problem_id(),
            Some(ProblemId::new(1500, "A"))
        );
        assert_eq!(record(Some("garbage")).daily_problem_id(), None);
        assert_eq!(record(None).daily_problem_id(), None);
    }

    #[test]
    fn channel_ids_convert() {
        let guild = record(None);

        assert_eq!(guild.leaderboard_channel_id(), Some(ChannelId::new(20)));
        assert_eq!(guild.announcement_channel_id(), None);
    }
}
