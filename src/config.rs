use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::common::constants::{
    BMKG_LATEST_URL, BMKG_SIGNIFICANT_URL, DEFAULT_LANG, DEFAULT_OPENWEATHER_KEY, DEFAULT_UNITS,
    MAX_SEISMIC_EVENTS, OPENWEATHER_CURRENT_URL, OPENWEATHER_KEY_ENV, OPENWEATHER_PUBLIC_KEY_ENV,
    SEISMIC_REVALIDATE_SECS, USER_AGENT, WEATHER_REVALIDATE_SECS,
};
use crate::common::error::{FeedError, Result};

/// Environment variable pointing at an alternate config file
pub const CONFIG_PATH_ENV: &str = "SIG_NUSANTARA_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub seismic: SeismicConfig,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeismicConfig {
    pub significant_url: String,
    pub latest_url: String,
    pub revalidate_seconds: u64,
    pub max_events: usize,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            significant_url: BMKG_SIGNIFICANT_URL.to_string(),
            latest_url: BMKG_LATEST_URL.to_string(),
            revalidate_seconds: SEISMIC_REVALIDATE_SECS,
            max_events: MAX_SEISMIC_EVENTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub units: String,
    pub lang: String,
    pub revalidate_seconds: u64,
    /// Credential from the config file, consulted after the environment
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: OPENWEATHER_CURRENT_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            lang: DEFAULT_LANG.to_string(),
            revalidate_seconds: WEATHER_REVALIDATE_SECS,
            api_key: None,
        }
    }
}

impl Config {
    /// Load from `$SIG_NUSANTARA_CONFIG`, else `config.toml`. A missing default
    /// file yields the built-in defaults; a missing explicit file is an error.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FeedError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the weather credential from the process environment
    pub fn openweather_key(&self) -> Option<String> {
        self.openweather_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the weather credential with a custom environment lookup
    pub fn openweather_key_with<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain = [
            CredentialSource::Env(OPENWEATHER_KEY_ENV),
            CredentialSource::Env(OPENWEATHER_PUBLIC_KEY_ENV),
            CredentialSource::Value(self.weather.api_key.as_deref()),
            CredentialSource::Value(Some(DEFAULT_OPENWEATHER_KEY)),
        ];
        resolve_credential(&chain, env)
    }
}

/// One link in a credential lookup chain
#[derive(Debug, Clone, Copy)]
pub enum CredentialSource<'a> {
    Env(&'a str),
    Value(Option<&'a str>),
}

/// First non-blank value in chain order wins
pub fn resolve_credential<F>(chain: &[CredentialSource<'_>], env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    chain.iter().find_map(|source| {
        let value = match *source {
            CredentialSource::Env(name) => env(name),
            CredentialSource::Value(v) => v.map(str::to_string),
        }?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
