pub mod commands;
pub mod context;
pub mod handler;
pub mod leaderboard;
pub mod publisher;
pub mod state;
pub mod tasks;
