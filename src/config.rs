use std::time::Duration;

use serenity::model::id::GuildId;
use thiserror::Error;

const DEFAULT_JUDGE_API_URL: &str = "https://codeforces.com/api";
const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{0} is not valid: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub application_id: u64,
    // Commands are registered per guild instead of globally when this isn't empty
    pub testing_guilds: Vec<GuildId>,
    pub judge_api_url: String,
    pub judge_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let discord_token = required("DISCORD_TOKEN")?;
        let database_url = required("DATABASE_URL")?;
        let application_id = required("APPLICATION_ID")?
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid("APPLICATION_ID", e.to_string()))?;
        if application_id == 0 {
            return Err(ConfigError::Invalid("APPLICATION_ID", "must not be 0".to_owned()));
        }

        let testing_guilds = lookup("TESTING_GUILDS").unwrap_or("[]".to_owned());
        let testing_guilds = serde_json::from_str::<Vec<GuildId>>(&testing_guilds)
            .map_err(|e| ConfigError::Invalid("TESTING_GUILDS", e.to_string()))?;

        let judge_api_url = lookup("JUDGE_API_URL")
            .unwrap_or(DEFAULT_JUDGE_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let judge_timeout = match lookup("JUDGE_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid("JUDGE_TIMEOUT_SECS", e.to_string()))?,
            None => DEFAULT_JUDGE_TIMEOUT_SECS,
        };

        Ok(Config {
            discord_token,
            database_url,
            application_id,
            testing_guilds,
            judge_api_url,
            judge_timeout: Duration::from_secs(judge_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DISCORD_TOKEN", "token"),
        ("DATABASE_URL", "postgres://localhost/bot"),
        ("APPLICATION_ID", "1234"),
    ];

    #[test]
    fn defaults_fill_optional_values() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.application_id, 1234);
        assert!(config.testing_guilds.is_empty());
        assert_eq!(config.judge_api_url, "https://codeforces.com/api");
        assert_eq!(config.judge_timeout, Duration::from_secs(10));
    }

    #[test]
    fn testing_guilds_parse_from_json() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("TESTING_GUILDS", "[\"81384788765712384\", 41771983423143937]"));
        pairs.push(("JUDGE_API_URL", "http://localhost:8080/api/"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.testing_guilds, vec![
            GuildId::new(81384788765712384),
            GuildId::new(41771983423143937)
        ]);
        assert_eq!(config.judge_api_url, "http://localhost:8080/api");
    }

    #[test]
    fn missing_token_is_reported() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[1 ..])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DISCORD_TOKEN")));
    }

    #[test]
    fn bad_application_id_is_reported() {
        let mut pairs = REQUIRED.to_vec();
        pairs[2] = ("APPLICATION_ID", "not-a-number");

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("APPLICATION_ID", _)));
    }
}
