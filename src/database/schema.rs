table! {
    guilds (id) {
        id -> Int8,
        daily_problem -> Nullable<Text>,
        leaderboard_channel -> Nullable<Int8>,
        announcement_channel -> Nullable<Int8>,
        leaderboard_message -> Nullable<Int8>,
    }
}

table! {
    server_users (server_id, user_id) {
        server_id -> Int8,
        user_id -> Int8,
        points -> Int8,
        last_submitted -> Nullable<Text>,
    }
}

table! {
    users (id, guild_id) {
        id -> Int8,
        guild_id -> Int8,
        handle -> Text,
    }
}

allow_tables_to_appear_in_same_query!(guilds, server_users, users,);
