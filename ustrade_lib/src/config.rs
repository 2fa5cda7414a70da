//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use ustrade_api::{Client, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::error::UsTradeError;

pub const ENV_BASE_URL: &str = "USTRADE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "USTRADE_TIMEOUT_SECS";
pub const ENV_API_KEY: &str = "CENSUS_API_KEY";
pub const ENV_COUNTRIES_CSV: &str = "USTRADE_COUNTRIES_CSV";
pub const ENV_HS_CODES_CSV: &str = "USTRADE_HS_CODES_CSV";

/// Settings for building a [`crate::TradeClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
    /// Country table to load instead of the bundled one.
    pub countries_csv: Option<PathBuf>,
    /// HS code table to load instead of the bundled one.
    pub hs_codes_csv: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            countries_csv: None,
            hs_codes_csv: None,
        }
    }
}

impl Config {
    /// Reads the `USTRADE_*` and `CENSUS_API_KEY` variables. Unset or empty
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, UsTradeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UsTradeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                UsTradeError::InvalidInput(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.api_key = get(ENV_API_KEY);
        config.countries_csv = get(ENV_COUNTRIES_CSV).map(PathBuf::from);
        config.hs_codes_csv = get(ENV_HS_CODES_CSV).map(PathBuf::from);
        Ok(config)
    }

    /// The low-level API client these settings describe.
    pub fn api_client(&self) -> Client {
        let client = Client::with_base_url(&self.base_url).with_timeout(self.timeout);
        match &self.api_key {
            Some(key) => client.with_api_key(key),
            None => client,
        }
    }
}
