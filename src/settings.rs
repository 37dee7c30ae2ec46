use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub listen: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Referral {
    pub link_base: String,
    pub commission_in_cents: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    pub server: Server,
    pub referral: Referral,
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(File::with_name(path)).build()?;

        config.try_deserialize()
    }
}
