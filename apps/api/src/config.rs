use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Server configuration loaded from environment variables.
///
/// The Replicate token is optional: without it the server still starts and
/// avatar requests fail at call time.
#[derive(Debug, Clone)]
pub struct Config {
    pub replicate_api_token: Option<String>,
    pub replicate_api_base: String,
    /// Unset means a started prediction is followed until it settles.
    pub poll_timeout: Option<Duration>,
    pub session_ttl: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Config {
            replicate_api_token: var("REPLICATE_API_TOKEN"),
            replicate_api_base: var("REPLICATE_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_REPLICATE_API_BASE.to_string()),
            poll_timeout: var("AVATAR_POLL_TIMEOUT_SECS")
                .map(|secs| secs.parse::<u64>().map(Duration::from_secs))
                .transpose()
                .context("AVATAR_POLL_TIMEOUT_SECS must be a whole number of seconds")?,
            session_ttl: var("SESSION_TTL_SECS")
                .map(|secs| secs.parse::<u64>())
                .transpose()
                .context("SESSION_TTL_SECS must be a whole number of seconds")?
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)),
            port: var("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }

    pub fn has_replicate_token(&self) -> bool {
        self.replicate_api_token.is_some()
    }
}

/// Log level for this crate when `RUST_LOG` carries no filter directives.
pub fn log_level() -> String {
    dotenvy::dotenv().ok();
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_leave_polling_unbounded() {
        let config = config_from(&[]).unwrap();
        assert!(config.poll_timeout.is_none());
        assert!(!config.has_replicate_token());
        assert_eq!(config.replicate_api_base, DEFAULT_REPLICATE_API_BASE);
        assert_eq!(config.port, 3001);
        assert_eq!(config.session_ttl, Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
    }

    #[test]
    fn test_poll_timeout_is_opt_in() {
        let config = config_from(&[("AVATAR_POLL_TIMEOUT_SECS", "90")]).unwrap();
        assert_eq!(config.poll_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[
            ("REPLICATE_API_TOKEN", "  "),
            ("AVATAR_POLL_TIMEOUT_SECS", ""),
            ("REPLICATE_API_BASE", "http://localhost:9000/v1/"),
        ])
        .unwrap();
        assert!(config.replicate_api_token.is_none());
        assert!(config.poll_timeout.is_none());
        assert_eq!(config.replicate_api_base, "http://localhost:9000/v1");
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("AVATAR_POLL_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("SESSION_TTL_SECS", "-1")]).is_err());
    }
}
