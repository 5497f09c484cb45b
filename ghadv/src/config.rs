use std::env;
use std::num::{ParseFloatError, ParseIntError};
use std::time::Duration;

use thiserror::Error;

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_TOKEN_LOWER: &str = "github_token";
pub const ENV_API_BASE_URL: &str = "GITHUB_API_BASE_URL";
pub const ENV_API_VERSION: &str = "GITHUB_API_VERSION";
pub const ENV_USER_AGENT: &str = "GITHUB_USER_AGENT";
pub const ENV_TIMEOUT_S: &str = "GITHUB_TIMEOUT_S";
pub const ENV_SLEEP_S: &str = "GITHUB_API_SLEEP_S";

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_USER_AGENT: &str = "ghadv/0.1";
pub const DEFAULT_TIMEOUT_S: u64 = 30;

/// An environment variable that failed to parse as its expected numeric type.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: expected an integer number of seconds")]
    InvalidInteger {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid {var}={value:?}: expected a number of seconds")]
    InvalidFloat {
        var: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Connection settings for the advisory API. Built once by the command
/// driver and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Option<String>,
    pub api_base_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_S),
        }
    }
}

impl ClientConfig {
    /// Resolve connection settings from the environment, falling back to the
    /// fixed defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            token: env_nonempty(ENV_TOKEN).or_else(|| env_nonempty(ENV_TOKEN_LOWER)),
            api_base_url: env_nonempty(ENV_API_BASE_URL)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_version: env_nonempty(ENV_API_VERSION)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            user_agent: env_nonempty(ENV_USER_AGENT)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            request_timeout: parse_timeout(env_nonempty(ENV_TIMEOUT_S))?,
        })
    }
}

/// Resolve the fixed pause between page fetches from `GITHUB_API_SLEEP_S`.
pub fn inter_page_delay_from_env() -> Result<Duration, ConfigError> {
    parse_delay(env_nonempty(ENV_SLEEP_S))
}

// An empty value counts as unset, so `GITHUB_TOKEN=""` still falls through
// to `github_token` and defaults apply.
fn env_nonempty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}

fn parse_timeout(raw: Option<String>) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_S)),
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(source) => Err(ConfigError::InvalidInteger {
                var: ENV_TIMEOUT_S,
                value: raw,
                source,
            }),
        },
    }
}

fn parse_delay(raw: Option<String>) -> Result<Duration, ConfigError> {
    match raw {
        None => Ok(Duration::ZERO),
        Some(raw) => match raw.parse::<f64>() {
            // from_secs_f64 panics on negative or non-finite input
            Ok(secs) if secs > 0.0 && secs.is_finite() => Ok(Duration::from_secs_f64(secs)),
            Ok(_) => Ok(Duration::ZERO),
            Err(source) => Err(ConfigError::InvalidFloat {
                var: ENV_SLEEP_S,
                value: raw,
                source,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_fixed_defaults() {
        let config = ClientConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.api_version, "2022-11-28");
        assert_eq!(config.user_agent, "ghadv/0.1");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_unset_uses_default() {
        let timeout = parse_timeout(None).unwrap();
        assert_eq!(timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_parses_integer_seconds() {
        let timeout = parse_timeout(Some("5".to_string())).unwrap();
        assert_eq!(timeout, Duration::from_secs(5));
    }

    #[test]
    fn timeout_rejects_non_integer() {
        let err = parse_timeout(Some("notanumber".to_string())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GITHUB_TIMEOUT_S"), "should name the variable: {msg}");
        assert!(msg.contains("notanumber"), "should echo the value: {msg}");
    }

    #[test]
    fn timeout_rejects_fractional_seconds() {
        assert!(parse_timeout(Some("2.5".to_string())).is_err());
    }

    #[test]
    fn timeout_rejects_negative_seconds() {
        assert!(parse_timeout(Some("-3".to_string())).is_err());
    }

    #[test]
    fn delay_unset_is_zero() {
        assert_eq!(parse_delay(None).unwrap(), Duration::ZERO);
    }

    #[test]
    fn delay_parses_fractional_seconds() {
        let delay = parse_delay(Some("0.25".to_string())).unwrap();
        assert_eq!(delay, Duration::from_millis(250));
    }

    #[test]
    fn delay_clamps_zero_and_negative_to_zero() {
        assert_eq!(parse_delay(Some("0.0".to_string())).unwrap(), Duration::ZERO);
        assert_eq!(parse_delay(Some("-1.5".to_string())).unwrap(), Duration::ZERO);
    }

    #[test]
    fn delay_rejects_non_numeric() {
        let err = parse_delay(Some("soon".to_string())).unwrap_err();
        assert!(err.to_string().contains("GITHUB_API_SLEEP_S"));
    }
}
