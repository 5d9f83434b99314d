use std::{io::Write, sync::Arc};

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql},
    migration::RunMigrationsError,
    serialize::{self, Output, ToSql},
    sql_types::BigInt,
    Connection,
    ConnectionError,
    PgConnection,
};
use serenity::{
    futures::lock::Mutex,
    model::id::{ChannelId, GuildId, MessageId, UserId},
};
use tracing::info;

pub use super::tables::{guilds::*, leaderboards::*, users::*};

embed_migrations!("migrations");

pub type DatabaseConn = Arc<Mutex<PgConnection>>;

pub fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
    PgConnection::establish(database_url)
}

pub fn run_migrations(conn: &PgConnection) -> Result<(), RunMigrationsError> {
    embedded_migrations::run(conn)?;
    info!("database migrations are up to date");
    Ok(())
}

/// Discord snowflakes are u64 but postgres only has signed integers, so they are stored bit-for-bit as BIGINT.
#[derive(Debug, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Clone, Copy)]
#[sql_type = "BigInt"]
pub struct DbId(pub u64);

impl<DB: Backend> FromSql<BigInt, DB> for DbId
where i64: FromSql<BigInt, DB>
{
    fn from_sql(bytes: Option<&DB::RawValue>) -> deserialize::Result<Self> {
        Ok(DbId(i64::from_sql(bytes)? as u64))
    }
}

impl<DB: Backend> ToSql<BigInt, DB> for DbId
where i64: ToSql<BigInt, DB>
{
    fn to_sql<W: Write>(&self, out: &mut Output<W, DB>) -> serialize::Result {
        (self.0 as i64).to_sql(out)
    }
}

macro_rules! id_conversions {
    ($($id:ty),*) => {
        $(impl From<$id> for DbId {
            fn from(id: $id) -> Self {
                DbId(id.get())
            }
        }

        impl From<DbId> for $id {
            fn from(id: DbId) -> Self {
                <$id>::new(id.0)
            }
        })*
    };
}

id_conversions!(GuildId, ChannelId, UserId, MessageId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_survive_conversion() {
        let guild = GuildId::new(u64::MAX - 7);
        let stored = DbId::from(guild);

        assert_eq!(stored.0 as i64, -8);
        assert_eq!(GuildId::from(stored), guild);
    }
}
