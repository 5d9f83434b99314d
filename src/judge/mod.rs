pub mod client;
pub mod problem;
pub mod submission;

pub use client::{JudgeClient, JudgeError};
pub use problem::{Problem, ProblemId};
pub use submission::{confirms_login, has_solved};
