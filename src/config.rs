use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SkycastError;

/// Runtime settings. Layered as: defaults < `skycast.toml` < `SKYCAST_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub weather_api_key: String,
    /// Base URL of the weather provider; endpoint files are joined onto it.
    pub weather_api_base: Url,
    /// Stored for users created without an explicit location.
    pub default_location: String,
    pub upstream_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:skycast.db".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: "info".to_string(),
            weather_api_key: String::new(),
            weather_api_base: Url::parse("http://api.weatherapi.com/v1/")
                .expect("static weather api url is valid"),
            default_location: "Boston".to_string(),
            upstream_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, SkycastError> {
        Self::figment()
            .extract()
            .map_err(|e| SkycastError::Config(e.to_string()))
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("skycast.toml"))
            .merge(Env::prefixed("SKYCAST_"))
    }
}
