use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    // Accepts both /contest/<id>/problem/<index> and /problemset/problem/<id>/<index>
    static ref PROBLEM_URL: Regex = Regex::new(
        r"^https?://(?:www\.|m\d\.)?codeforces\.com/(?:contest/(\d+)/problem|problemset/problem/(\d+))/([A-Za-z0-9]+)/?(?:[?#].*)?$"
    )
    .unwrap();
}

/// A judge problem identified by contest and index, written as `"<contestId>/<index>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProblemId {
    pub contest_id: u32,
    pub index: String,
}

impl ProblemId {
    pub fn new(contest_id: u32, index: impl Into<String>) -> Self {
        ProblemId {
            contest_id,
            index: index.into(),
        }
    }

    /// Extracts the problem from a Codeforces problem URL.
    pub fn from_url(url: &str) -> Option<Self> {
        let captures = PROBLEM_URL.captures(url.trim())?;
        let contest_id = captures.get(1).or(captures.get(2))?.as_str().parse().ok()?;
        let index = captures.get(3)?.as_str();

        Some(ProblemId::new(contest_id, index))
    }

    pub fn url(&self) -> String {
        format!(
            "https://codeforces.com/problemset/problem/{}/{}",
            self.contest_id, self.index
        )
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.contest_id, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProblemIdError;

impl fmt::Display for ParseProblemIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a problem id of the form <contestId>/<index>")
    }
}

impl std::error::Error for ParseProblemIdError {}

impl FromStr for ProblemId {
    type Err = ParseProblemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (contest, index) = s.split_once('/').ok_or(ParseProblemIdError)?;
        let contest_id = contest.parse().map_err(|_| ParseProblemIdError)?;

        if index.is_empty() || !index.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParseProblemIdError);
        }

        Ok(ProblemId::new(contest_id, index))
    }
}

/// A problem as listed by `problemset.problems`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    // Missing for problems outside of regular contests
    pub contest_id: Option<u32>,
    pub index: String,
    pub name: String,
    pub rating: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Problem {
    pub fn id(&self) -> Option<ProblemId> {
        self.contest_id
            .map(|contest_id| ProblemId::new(contest_id, self.index.clone()))
    }

    pub fn is(&self, id: &ProblemId) -> bool {
        self.contest_id == Some(id.contest_id) && self.index == id.index
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSet {
    pub problems: Vec<Problem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contest_url_is_parsed() {
        let id = ProblemId::from_url("https://codeforces.com/contest/1500/problem/A").unwrap();

        assert_eq!(id.contest_id, 1500);
        assert_eq!(id.index, "A");
    }

    #[test]
    fn problemset_url_is_parsed() {
        let id = ProblemId::from_url("https://codeforces.com/problemset/problem/1721/C1/").unwrap();
        assert_eq!(id, ProblemId::new(1721, "C1"));
    }

    #[test]
    fn unrelated_urls_are_rejected() {
        assert_eq!(ProblemId::from_url("https://example.com/foo"), None);
        assert_eq!(
            ProblemId::from_url("https://example.com/contest/1500/problem/A"),
            None
        );
        assert_eq!(
            ProblemId::from_url("https://codeforces.com/contest/abc/problem/A"),
            None
        );
        assert_eq!(ProblemId::from_url("https://codeforces.com/contest/1500"), None);
    }

    #[test]
    fn ids_display_and_parse() {
        let id: ProblemId = "100/A".parse().unwrap();

        assert_eq!(id, ProblemId::new(100, "A"));
        assert_eq!(id.to_string(), "100/A");
        assert!("100".parse::<ProblemId>().is_err());
        assert!("x/A".parse::<ProblemId>().is_err());
        assert!("100/".parse::<ProblemId>().is_err());
    }

    #[test]
    fn problems_without_contest_have_no_id() {
        let problem: Problem =
            serde_json::from_str(r#"{"index": "B", "name": "Acmsguru", "tags": []}"#).unwrap();

        assert_eq!(problem.id(), None);
        assert!(!problem.is(&ProblemId::new(0, "B")));
    }
}
