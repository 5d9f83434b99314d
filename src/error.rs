use serenity::http::HttpError;
use thiserror::Error;

use crate::judge::JudgeError;

// Discord JSON error codes for interactions we can no longer answer
const UNKNOWN_INTERACTION: isize = 10062;
const ALREADY_ACKNOWLEDGED: isize = 40060;

pub type CommandResult = Result<(), BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("judge request failed: {0}")]
    Judge(#[from] JudgeError),
    #[error("database query failed: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("discord request failed: {0}")]
    Discord(#[from] serenity::Error),
    #[error("command used outside of a server")]
    GuildOnly,
}

impl BotError {
    /// The text shown to the user when a command fails with this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::Judge(_) => "Couldn't reach Codeforces right now, try again in a bit.",
            BotError::Database(_) => "Something went wrong while saving your data.",
            BotError::Discord(_) => "Something went wrong while talking to Discord.",
            BotError::GuildOnly => "This command can only be used inside a server.",
        }
    }

    /// True when Discord rejected a reply because the interaction token expired
    /// or was already answered. Nothing can be sent back in that case.
    pub fn is_expired_interaction(&self) -> bool {
        match self {
            BotError::Discord(err) => is_expired_interaction(err),
            _ => false,
        }
    }
}

fn http_error(err: &serenity::Error) -> Option<&HttpError> {
    match err {
        serenity::Error::Http(http) => Some(http),
        _ => None,
    }
}

pub fn is_expired_interaction(err: &serenity::Error) -> bool {
    match http_error(err) {
        Some(HttpError::UnsuccessfulRequest(response)) => matches!(
            response.error.code,
            UNKNOWN_INTERACTION | ALREADY_ACKNOWLEDGED
        ),
        _ => false,
    }
}

/// True when Discord reports that the referenced message no longer exists.
pub fn is_unknown_message(err: &serenity::Error) -> bool {
    match http_error(err) {
        Some(HttpError::UnsuccessfulRequest(response)) => response.error.code == 10008,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serenity::http::ErrorResponse;

    use super::*;

    // Builds the error serenity returns when Discord answers with a JSON error body
    async fn discord_error(code: isize) -> serenity::Error {
        let body = format!(r#"{{"code": {}, "message": "test"}}"#, code);
        let response = http::Response::builder().status(404).body(body).unwrap();
        let response =
            ErrorResponse::from_response(reqwest::Response::from(response), reqwest::Method::POST).await;

        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
    }

    #[tokio::test]
    async fn expired_interactions_are_detected() {
        assert!(is_expired_interaction(&discord_error(UNKNOWN_INTERACTION).await));
        assert!(is_expired_interaction(&discord_error(ALREADY_ACKNOWLEDGED).await));
        assert!(BotError::Discord(discord_error(10062).await).is_expired_interaction());

        assert!(!is_expired_interaction(&discord_error(10008).await));
        assert!(!is_expired_interaction(&discord_error(50013).await));
    }

    #[tokio::test]
    async fn deleted_messages_are_detected() {
        assert!(is_unknown_message(&discord_error(10008).await));
        assert!(!is_unknown_message(&discord_error(10062).await));
    }

    #[test]
    fn non_discord_errors_are_not_expiry() {
        assert!(!BotError::GuildOnly.is_expired_interaction());
        assert!(!BotError::Database(diesel::result::Error::NotFound).is_expired_interaction());
    }

    #[test]
    fn other_serenity_errors_are_not_expiry() {
        let err = serenity::Error::Other("boom");
        assert!(!is_expired_interaction(&err));
        assert!(!is_unknown_message(&err));
    }

    #[test]
    fn user_messages_hide_details() {
        let err = BotError::Judge(JudgeError::Failed("handle: not found".to_owned()));
        assert!(!err.user_message().contains("handle"));
    }
}
