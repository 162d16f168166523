use serde::{de, de::Deserializer, Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::ConfigError;

pub const ENV_API_URL: &str = "PUNDI_API_URL";
pub const ENV_BACKEND: &str = "PUNDI_BACKEND";
pub const ENV_LOG: &str = "PUNDI_LOG";

/// Stores user-configurable client preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Endpoint of the hosted backend. Required for [`BackendKind::Http`].
    pub api_url: Option<String>,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "Config::default_photo_max_dimension")]
    pub photo_max_dimension: u32,
    #[serde(default = "Config::default_photo_quality")]
    pub photo_quality: f32,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Tracing filter directive, e.g. `pundi=debug`.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            backend: BackendKind::default(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            photo_max_dimension: Self::default_photo_max_dimension(),
            photo_quality: Self::default_photo_quality(),
            currency_symbol: Self::default_currency_symbol(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_request_timeout_secs() -> u64 {
        15
    }

    pub fn default_photo_max_dimension() -> u32 {
        150
    }

    pub fn default_photo_quality() -> f32 {
        0.7
    }

    pub fn default_currency_symbol() -> String {
        "Rp".into()
    }

    /// Applies `PUNDI_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = Some(url.trim().to_string());
        }
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = Some(filter);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == BackendKind::Http
            && self.api_url.as_deref().map_or(true, |url| url.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "the http backend needs `api_url` (or {ENV_API_URL})"
            )));
        }
        if self.photo_max_dimension == 0 {
            return Err(ConfigError::Invalid(
                "photo_max_dimension must be positive".into(),
            ));
        }
        if !(self.photo_quality > 0.0 && self.photo_quality <= 1.0) {
            return Err(ConfigError::Invalid(
                "photo_quality must be within (0, 1]".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Which backend implementation the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Http,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    /// Accepts `http` and `memory` (alias `preview`), case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "memory" | "preview" => Ok(BackendKind::Memory),
            other => Err(ConfigError::Invalid(format!(
                "unknown backend `{other}` (expected http or memory)"
            ))),
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Http
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendKind::Http => "http",
            BackendKind::Memory => "memory",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => value.parse().map_err(de::Error::custom),
            None => Ok(BackendKind::default()),
        }
    }
}
