mod database;
pub mod schema;
pub mod tables;

pub use database::*;
