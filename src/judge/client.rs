use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    problem::{Problem, ProblemSet},
    submission::{JudgeUser, Submission},
};

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("judge returned {0}")]
    Failed(String),
}

// Every Codeforces API response is wrapped in this envelope
#[derive(Deserialize)]
struct Envelope<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, JudgeError> {
    let envelope = serde_json::from_str::<Envelope<T>>(body)?;

    match (envelope.status.as_str(), envelope.result) {
        ("OK", Some(result)) => Ok(result),
        ("OK", None) => Err(JudgeError::Failed("OK status without a result".to_owned())),
        (status, _) => Err(JudgeError::Failed(
            envelope.comment.unwrap_or(status.to_owned()),
        )),
    }
}

/// Read-only client for the Codeforces public API.
#[derive(Clone)]
pub struct JudgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl JudgeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(JudgeClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, JudgeError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "calling judge api");

        // Failed calls come back as 400 with a FAILED envelope, so the body is decoded regardless of status
        let body = self.http.get(&url).query(query).send().await?.text().await?;

        decode_envelope(&body).map_err(|err| {
            warn!(method, "judge api call failed: {}", err);
            err
        })
    }

    /// Submissions of a handle, newest first. `window` is `(from, count)` with `from` starting at 1.
    pub async fn user_submissions(
        &self,
        handle: &str,
        window: Option<(u32, u32)>,
    ) -> Result<Vec<Submission>, JudgeError> {
        let mut query = vec![("handle", handle.to_owned())];
        if let Some((from, count)) = window {
            query.push(("from", from.to_string()));
            query.push(("count", count.to_string()));
        }

        self.call("user.status", &query).await
    }

    pub async fn latest_submission(&self, handle: &str) -> Result<Option<Submission>, JudgeError> {
        let submissions = self.user_submissions(handle, Some((1, 1))).await?;
        Ok(submissions.into_iter().next())
    }

    pub async fn problems(&self) -> Result<Vec<Problem>, JudgeError> {
        let set: ProblemSet = self.call("problemset.problems", &[]).await?;
        Ok(set.problems)
    }

    pub async fn user_info(&self, handle: &str) -> Result<JudgeUser, JudgeError> {
        let users: Vec<JudgeUser> = self
            .call("user.info", &[("handles", handle.to_owned())])
            .await?;

        users
            .into_iter()
            .next()
            .ok_or(JudgeError::Failed(format!("no user returned for {}", handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::problem::ProblemId;

    #[test]
    fn ok_envelope_yields_result() {
        let body = r#"{"status":"OK","result":{"problems":[
            {"contestId":1500,"index":"A","name":"Going Home","type":"PROGRAMMING","rating":1800,"tags":["brute force"]}
        ],"problemStatistics":[]}}"#;

        let set: ProblemSet = decode_envelope(body).unwrap();

        assert_eq!(set.problems.len(), 1);
        assert!(set.problems[0].is(&ProblemId::new(1500, "A")));
        assert_eq!(set.problems[0].rating, Some(1800));
    }

    #[test]
    fn failed_envelope_carries_comment() {
        let body = r#"{"status":"FAILED","comment":"handle: User with handle nobody not found"}"#;

        match decode_envelope::<Vec<Submission>>(body) {
            Err(JudgeError::Failed(comment)) => assert!(comment.contains("not found")),
            other => panic!("unexpected result {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_envelope::<Vec<Submission>>("<html>502</html>"),
            Err(JudgeError::Decode(_))
        ));
    }

    #[test]
    fn base_url_is_normalized() {
        let client = JudgeClient::new("https://codeforces.com/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "https://codeforces.com/api");
    }
}
