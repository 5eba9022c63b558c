//! Environment-driven application configuration.
//!
//! Read once at startup. Secrets and the database URL are required; every
//! other knob has a production-sensible default.

use std::env;
use std::time::Duration;

use reqwest::Url;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/";
const DEFAULT_UNSPLASH_BASE_URL: &str = "https://api.unsplash.com/";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IMAGE_QUERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 20;

/// Errors raised while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    Missing { name: &'static str },

    #[error("environment variable {name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub openrouter_base_url: Url,
    pub openrouter_api_key: String,
    /// Model override; `None` keeps the adapter default.
    pub openrouter_model: Option<String>,
    pub unsplash_base_url: Url,
    pub unsplash_access_key: String,
    /// Per-request bound on language-model calls.
    pub generation_timeout: Duration,
    /// Per-query bound on image search.
    pub image_query_timeout: Duration,
    /// Per-download bound on image fetches during export.
    pub image_fetch_timeout: Duration,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing required variable or an
    /// unparseable URL or duration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
            openrouter_base_url: base_url("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL)?,
            openrouter_api_key: required("OPENROUTER_API_KEY")?,
            openrouter_model: env::var("OPENROUTER_MODEL").ok(),
            unsplash_base_url: base_url("UNSPLASH_BASE_URL", DEFAULT_UNSPLASH_BASE_URL)?,
            unsplash_access_key: required("UNSPLASH_ACCESS_KEY")?,
            generation_timeout: timeout_secs(
                "GENERATION_TIMEOUT_SECS",
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )?,
            image_query_timeout: timeout_secs(
                "IMAGE_QUERY_TIMEOUT_SECS",
                DEFAULT_IMAGE_QUERY_TIMEOUT_SECS,
            )?,
            image_fetch_timeout: timeout_secs(
                "IMAGE_FETCH_TIMEOUT_SECS",
                DEFAULT_IMAGE_FETCH_TIMEOUT_SECS,
            )?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { name }),
    }
}

/// Parse a base URL, defaulting and normalising to a trailing slash so that
/// relative joins keep the full path.
fn base_url(name: &'static str, default: &str) -> Result<Url, ConfigError> {
    let mut raw = env::var(name).unwrap_or_else(|_| default.to_owned());
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|error| ConfigError::Invalid {
        name,
        message: error.to_string(),
    })
}

fn timeout_secs(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let secs = match env::var(name) {
        Ok(raw) => raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
            name,
            message: error.to_string(),
        })?,
        Err(_) => default,
    };
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            message: "timeout must be at least one second".to_owned(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    //!
    //! Environment mutation is process-global, so these tests use unique
    //! variable names through the helpers instead of the `from_env` entry
    //! point.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn missing_required_variable_is_reported_by_name() {
        let err = required("TEST_CONFIG_UNSET_VARIABLE").expect_err("unset variable");
        assert_eq!(
            err,
            ConfigError::Missing {
                name: "TEST_CONFIG_UNSET_VARIABLE"
            }
        );
    }

    #[rstest]
    fn base_url_defaults_carry_a_trailing_slash() {
        let url = base_url("TEST_CONFIG_UNSET_BASE_URL", "https://api.example.com/v1")
            .expect("default parses");
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(
            url.join("chat/completions").expect("joins").as_str(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[rstest]
    fn unset_timeouts_fall_back_to_their_default() {
        let timeout = timeout_secs("TEST_CONFIG_UNSET_TIMEOUT", 30).expect("default applies");
        assert_eq!(timeout, Duration::from_secs(30));
    }
}
