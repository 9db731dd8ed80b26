//! Server connection settings.
//!
//! # Design
//! The dispatcher asks a `SettingsResolver` for fresh settings on every call,
//! so an embedding application can swap base URL or token without rebuilding
//! the dispatcher. `ServerSettings` resolves to itself for the common static
//! case and can be read from the environment.

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "SERVER_BASE_URL";
pub const TOKEN_VAR: &str = "SERVER_TOKEN";

/// Base URL plus the headers sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub base_url: String,
    pub default_headers: Vec<(String, String)>,
}

fn default_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

impl ServerSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: default_headers(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Authenticate with the server's token scheme.
    pub fn with_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("token {}", token.as_ref());
        self.with_header("authorization", value)
    }

    /// Read `SERVER_BASE_URL` (required) and `SERVER_TOKEN` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).ok_or(ConfigError::MissingVar(BASE_URL_VAR))?;
        if base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let settings = Self::new(base_url);
        Ok(match lookup(TOKEN_VAR).filter(|token| !token.is_empty()) {
            Some(token) => settings.with_token(token),
            None => settings,
        })
    }
}

/// Source of the settings used for each request.
pub trait SettingsResolver: Send + Sync {
    fn resolve(&self) -> ServerSettings;
}

impl SettingsResolver for ServerSettings {
    fn resolve(&self) -> ServerSettings {
        self.clone()
    }
}

impl<F> SettingsResolver for F
where
    F: Fn() -> ServerSettings + Send + Sync,
{
    fn resolve(&self) -> ServerSettings {
        self()
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn join_collapses_slashes() {
        assert_eq!(join_url("http://localhost:8888/", "/runtimes"), "http://localhost:8888/runtimes");
        assert_eq!(join_url("http://localhost:8888/lab", "runtimes/r1"), "http://localhost:8888/lab/runtimes/r1");
        assert_eq!(join_url("http://localhost:8888/", ""), "http://localhost:8888");
    }

    #[test]
    fn new_settings_send_json_content_type() {
        let settings = ServerSettings::new("http://localhost:8888");
        assert_eq!(
            settings.default_headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn from_lookup_reads_base_url_and_token() {
        let settings = ServerSettings::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:8888"),
            (TOKEN_VAR, "abc"),
        ]))
        .unwrap();
        assert_eq!(settings.base_url, "http://localhost:8888");
        assert!(settings
            .default_headers
            .contains(&("authorization".to_string(), "token abc".to_string())));
    }

    #[test]
    fn from_lookup_requires_base_url() {
        let err = ServerSettings::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(BASE_URL_VAR));

        let err = ServerSettings::from_lookup(lookup(&[(BASE_URL_VAR, " ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyBaseUrl);
    }

    #[test]
    fn closures_resolve_settings() {
        let resolver = || ServerSettings::new("http://example.test");
        assert_eq!(resolver.resolve().base_url, "http://example.test");
    }
}
