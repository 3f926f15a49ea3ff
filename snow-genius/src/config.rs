//! Client configuration loaded via OrthoConfig, plus endpoint resolution.
//!
//! Settings come from `SNOW_GENIUS_*` environment variables and configuration
//! files; command-line flags are layered on top by the binary. The endpoint
//! overrides `API_URL` and `API_BASE` are read through [`mockable::Env`] so
//! resolution can be tested without touching the process environment.

use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::domain::{ParseScoringModeError, ScoringMode};
use crate::outbound::scoring::DEFAULT_TIMEOUT;

/// Environment variable replacing the whole scoring endpoint.
pub const API_URL_ENV: &str = "API_URL";
/// Environment variable replacing the scoring origin; the mode path is kept.
pub const API_BASE_ENV: &str = "API_BASE";

const DEFAULT_CATALOG: &str = "resorts.json";

/// Configuration values for the scoring client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SNOW_GENIUS")]
pub struct SnowGeniusSettings {
    /// Scoring mode: `single`, `multi`, or `auto`.
    pub mode: Option<String>,
    /// Client timeout for scoring and catalog requests, in seconds.
    pub timeout_secs: Option<u64>,
    /// Resort catalog path or URL.
    pub catalog: Option<String>,
    /// Enable diagnostic output.
    #[ortho_config(default = false)]
    pub dev_mode: bool,
}

impl SnowGeniusSettings {
    /// Return the configured mode, falling back to multi.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Mode`] when the configured name is unknown.
    pub fn mode(&self) -> Result<ScoringMode, ConfigError> {
        self.mode
            .as_deref()
            .map_or(Ok(ScoringMode::default()), str::parse::<ScoringMode>)
            .map_err(ConfigError::from)
    }

    /// Return the configured timeout, falling back to the default.
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Return the configured catalog source, falling back to `resorts.json`.
    pub fn catalog(&self) -> &str {
        self.catalog.as_deref().unwrap_or(DEFAULT_CATALOG)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configured mode name is unknown.
    #[error(transparent)]
    Mode(#[from] ParseScoringModeError),
    /// An endpoint override is not an absolute URL.
    #[error("{source_name} is not a valid URL (`{value}`): {message}")]
    InvalidUrl {
        /// Where the value came from.
        source_name: &'static str,
        /// Value as given.
        value: String,
        /// Parser message.
        message: String,
    },
}

/// Resolve the scoring endpoint for `mode`.
///
/// An explicit URL wins, then `API_URL` (the whole endpoint), then
/// `API_BASE` with the mode's path appended, then the hosted default. Blank
/// variables are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when the chosen value does not parse.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use snow_genius::config::resolve_endpoint;
/// use snow_genius::domain::ScoringMode;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "API_BASE" => Some("http://localhost:8000/".to_owned()),
///     _ => None,
/// });
///
/// let url = resolve_endpoint(None, &env, ScoringMode::Auto).expect("valid url");
/// assert_eq!(url.as_str(), "http://localhost:8000/score_pass");
/// ```
pub fn resolve_endpoint<E: Env>(
    explicit: Option<&str>,
    env: &E,
    mode: ScoringMode,
) -> Result<Url, ConfigError> {
    if let Some(url) = explicit.map(str::trim).filter(|url| !url.is_empty()) {
        return parse_url("--api-url", url);
    }
    if let Some(url) = non_blank(env, API_URL_ENV) {
        debug!(%mode, "using API_URL override");
        return parse_url(API_URL_ENV, &url);
    }
    if let Some(base) = non_blank(env, API_BASE_ENV) {
        debug!(%mode, "using API_BASE override");
        let joined = format!("{}{}", base.trim_end_matches('/'), mode.endpoint_path());
        return parse_url(API_BASE_ENV, &joined);
    }
    parse_url("default endpoint", &mode.default_endpoint())
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_url(source_name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|error| ConfigError::InvalidUrl {
        source_name,
        value: value.to_owned(),
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and endpoint resolution.

    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use mockable::MockEnv;
    use rstest::rstest;

    fn load_from_empty_args() -> SnowGeniusSettings {
        SnowGeniusSettings::load_from_iter([OsString::from("snow-genius")])
            .expect("config should load")
    }

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("SNOW_GENIUS_MODE", None::<String>),
            ("SNOW_GENIUS_TIMEOUT_SECS", None::<String>),
            ("SNOW_GENIUS_CATALOG", None::<String>),
            ("SNOW_GENIUS_DEV_MODE", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.mode(), Ok(ScoringMode::Multi));
        assert_eq!(settings.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(settings.catalog(), DEFAULT_CATALOG);
        assert!(!settings.dev_mode);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SNOW_GENIUS_MODE", Some("single".to_owned())),
            ("SNOW_GENIUS_TIMEOUT_SECS", Some("5".to_owned())),
            (
                "SNOW_GENIUS_CATALOG",
                Some("https://example.com/resorts.json".to_owned()),
            ),
            ("SNOW_GENIUS_DEV_MODE", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.mode(), Ok(ScoringMode::Single));
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.catalog(), "https://example.com/resorts.json");
        assert!(settings.dev_mode);
    }

    #[rstest]
    fn unknown_modes_are_reported() {
        let settings = SnowGeniusSettings {
            mode: Some("combo".to_owned()),
            timeout_secs: Some(0),
            catalog: None,
            dev_mode: false,
        };

        assert!(matches!(settings.mode(), Err(ConfigError::Mode(_))));
        assert_eq!(settings.timeout(), DEFAULT_TIMEOUT);
    }

    #[rstest]
    #[case::default_multi(
        &[],
        ScoringMode::Multi,
        "https://pass-picker-expert-mode-multi.onrender.com/score_multi_pass"
    )]
    #[case::default_single(
        &[],
        ScoringMode::Single,
        "https://pass-picker-expert-mode.onrender.com/expert_mode/calculate"
    )]
    #[case::api_url_wins(
        &[("API_URL", "http://localhost:9000/custom"), ("API_BASE", "http://ignored")],
        ScoringMode::Multi,
        "http://localhost:9000/custom"
    )]
    #[case::api_base_appends_path(
        &[("API_BASE", "http://localhost:8000/")],
        ScoringMode::Single,
        "http://localhost:8000/expert_mode/calculate"
    )]
    #[case::blank_values_are_ignored(
        &[("API_URL", "  "), ("API_BASE", "")],
        ScoringMode::Auto,
        "https://pass-picker-expert-mode-multi.onrender.com/score_pass"
    )]
    fn resolves_endpoints_from_env(
        #[case] vars: &[(&str, &str)],
        #[case] mode: ScoringMode,
        #[case] expected: &str,
    ) {
        let env = mock_env(vars);
        let url = resolve_endpoint(None, &env, mode).expect("valid endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn explicit_url_beats_environment() {
        let env = mock_env(&[("API_URL", "http://localhost:9000/custom")]);
        let url = resolve_endpoint(Some("http://127.0.0.1:1/score"), &env, ScoringMode::Multi)
            .expect("valid endpoint");
        assert_eq!(url.as_str(), "http://127.0.0.1:1/score");
    }

    #[rstest]
    fn invalid_overrides_are_reported() {
        let env = mock_env(&[("API_URL", "not a url")]);
        let error = resolve_endpoint(None, &env, ScoringMode::Multi).expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::InvalidUrl {
                source_name: "API_URL",
                ..
            }
        ));
    }
}
