use diesel::{pg::PgConnection, prelude::*, Queryable};
use serenity::model::id::{GuildId, UserId};

use crate::database::{schema::*, DbId};

/// A Discord user who proved ownership of a Codeforces handle within a guild.
#[derive(Queryable, Insertable, Clone, Debug)]
#[table_name = "users"]
pub struct UserRecord {
    pub id: DbId,
    pub guild_id: DbId,
    pub handle: String,
}

pub fn get_user(
    conn: &PgConnection,
    user_id: UserId,
    guild_id: GuildId,
) -> QueryResult<Option<UserRecord>> {
    users::table
        .find((DbId::from(user_id), DbId::from(guild_id)))
        .first::<UserRecord>(conn)
        .optional()
}

pub fn get_guild_users(conn: &PgConnection, guild_id: GuildId) -> QueryResult<Vec<UserRecord>> {
    users::table
        .filter(users::guild_id.eq(DbId::from(guild_id)))
        .load::<UserRecord>(conn)
}

// Logging in again replaces the linked handle
pub fn save_user(
    conn: &PgConnection,
    user_id: UserId,
    guild_id: GuildId,
    handle: &str,
) -> QueryResult<UserRecord> {
    let record = UserRecord {
        id: user_id.into(),
        guild_id: guild_id.into(),
        handle: handle.to_owned(),
    };

    diesel::insert_into(users::table)
        .values(&record)
        .on_conflict((users::id, users::guild_id))
        .do_update()
        .set(users::handle.eq(record.handle.as_str()))
        .get_result(conn)
}
