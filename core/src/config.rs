//! Client configuration, resolved once at process start.

use std::time::Duration;

use ::config::{Config, Environment};
use serde::Deserialize;

use crate::error::ConfigError;

/// Prefix of the environment variables read by `ClientConfig::load`.
pub const ENV_PREFIX: &str = "FLEET";

#[derive(Debug, Deserialize)]
struct RawClientConfig {
    api_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    read_only: bool,
}

/// Settings shared by every operation of a `DataProvider`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    timeout: Option<Duration>,
    read_only: bool,
}

impl ClientConfig {
    /// Validates `api_url` and builds a writable configuration without timeout.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: format!("expected an http(s) URL, got `{api_url}`"),
            });
        }
        Ok(Self {
            api_url: api_url.to_string(),
            timeout: None,
            read_only: false,
        })
    }

    /// Reads `FLEET_API_URL`, `FLEET_TIMEOUT_SECS` and `FLEET_READ_ONLY`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds from a `FLEET_`-style environment source.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder().add_source(environment).build()?;
        Self::from_settings(settings)
    }

    /// Builds from an already assembled `config::Config`.
    pub fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let raw: RawClientConfig = settings.try_deserialize()?;
        let api_url = raw.api_url.ok_or(ConfigError::Missing("api_url"))?;
        let config = Self::new(&api_url)?.read_only(raw.read_only);
        match raw.timeout_secs {
            Some(0) => Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            }),
            Some(secs) => Ok(config.timeout(Duration::from_secs(secs))),
            None => Ok(config),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Rejects create, update and delete without contacting the backend.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Config {
        pairs
            .iter()
            .fold(Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://localhost:3000/").unwrap();
        assert_eq!(config.api_url(), "http://localhost:3000");
    }

    #[test]
    fn empty_url_is_missing() {
        assert!(matches!(
            ClientConfig::new("  "),
            Err(ConfigError::Missing("api_url"))
        ));
    }

    #[test]
    fn non_http_url_is_invalid() {
        let err = ClientConfig::new("ftp://fleet").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "api_url", .. }));
    }

    #[test]
    fn settings_without_api_url_fail_fast() {
        let err = ClientConfig::from_settings(settings(&[("read_only", "true")])).unwrap_err();
        assert_eq!(err.to_string(), "missing required setting `api_url`");
    }

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars: ::config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn prefixed_environment_is_applied() {
        let config = ClientConfig::from_environment(environment(&[
            ("FLEET_API_URL", "https://fleet.example/api/"),
            ("FLEET_TIMEOUT_SECS", "15"),
            ("FLEET_READ_ONLY", "true"),
            ("OTHER_API_URL", "https://elsewhere.example"),
        ]))
        .unwrap();
        assert_eq!(config.api_url(), "https://fleet.example/api");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert!(config.is_read_only());
    }

    #[test]
    fn environment_without_api_url_fails_fast() {
        let err = ClientConfig::from_environment(environment(&[
            ("FLEET_READ_ONLY", "false"),
            ("API_URL", "https://fleet.example"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("api_url")));
    }

    #[test]
    fn environment_rejects_zero_timeout() {
        let err = ClientConfig::from_environment(environment(&[
            ("FLEET_API_URL", "https://fleet.example"),
            ("FLEET_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timeout_secs", .. }));
    }

    #[test]
    fn settings_are_applied() {
        let config = ClientConfig::from_settings(settings(&[
            ("api_url", "https://fleet.example/api"),
            ("timeout_secs", "15"),
            ("read_only", "true"),
        ]))
        .unwrap();
        assert_eq!(config.api_url(), "https://fleet.example/api");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert!(config.is_read_only());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::from_settings(settings(&[
            ("api_url", "http://localhost:3000"),
            ("timeout_secs", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timeout_secs", .. }));
    }
}
