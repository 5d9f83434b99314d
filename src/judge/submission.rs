use serde::Deserialize;

use super::problem::{Problem, ProblemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Ok,
    Failed,
    Partial,
    CompilationError,
    RuntimeError,
    WrongAnswer,
    PresentationError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolated,
    Crashed,
    InputPreparationCrashed,
    Challenged,
    Skipped,
    Testing,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    pub creation_time_seconds: i64,
    pub problem: Problem,
    // Absent while the submission is still queued
    pub verdict: Option<Verdict>,
}

impl Submission {
    pub fn is_for(&self, problem: &ProblemId) -> bool {
        self.problem.is(problem)
    }

    pub fn has_verdict(&self, verdict: Verdict) -> bool {
        self.verdict == Some(verdict)
    }
}

/// Whether any submission solved the given problem.
pub fn has_solved(submissions: &[Submission], problem: &ProblemId) -> bool {
    submissions
        .iter()
        .any(|s| s.is_for(problem) && s.has_verdict(Verdict::Ok))
}

/// Whether the latest submission proves ownership of a handle: it has to be a
/// compilation error on the problem handed out by the login prompt.
pub fn confirms_login(latest: &Submission, problem: &ProblemId) -> bool {
    latest.is_for(problem) && latest.has_verdict(Verdict::CompilationError)
}

/// A handle as returned by `user.info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeUser {
    // Canonical capitalization of the handle
    pub handle: String,
}
