use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_ORIGIN: &str = "https://www.bien-dans-ma-ville.fr";

/// Runtime settings: built-in defaults overridden by `VILLE_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Site root used to build `<origin>/<slug>/avis.html`.
    pub origin: String,
    pub user_agent: String,
    /// Per-request timeout. Zero keeps the client default (none).
    pub timeout_secs: u64,
    /// File name of the aggregate table written next to the json records.
    pub csv_name: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("VILLE"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("origin", DEFAULT_ORIGIN)?
            .set_default("user_agent", concat!("ville_scraper/", env!("CARGO_PKG_VERSION")))?
            .set_default("timeout_secs", 0)?
            .set_default("csv_name", "!scores.csv")?
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
