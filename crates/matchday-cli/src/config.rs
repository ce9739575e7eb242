use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// CLI configuration, merged from `matchday.toml` and `MATCHDAY_*`
/// environment variables.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file
    pub database: String,
    /// How many days `list` covers when `--to` is omitted
    pub default_window_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "matchday.db".to_string(),
            default_window_days: 14,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("matchday.toml"))
            .merge(Env::prefixed("MATCHDAY_"))
            .extract()
    }
}
