use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Runtime settings, read from the environment.
///
/// * `API_BASE_URL` - base URL of the upload endpoint (required)
/// * `LISTEN_ADDR` - address the page is served on (default `127.0.0.1:3000`)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::Config(e.to_string()));
            }
        }

        Self::extract(Figment::new().merge(Env::raw().only(&["api_base_url", "listen_addr"])))
    }

    /// Extract and check settings from any figment.
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        url::Url::parse(&config.api_base_url)
            .map_err(|e| Error::Config(format!("API_BASE_URL {:?}: {}", config.api_base_url, e)))?;

        Ok(config)
    }
}
