/*

   Every table function returns a QueryResult and leaves it to the caller to decide
   whether a failure gets reported to the user or only logged

*/
pub mod guilds;
pub mod leaderboards;
pub mod users;
