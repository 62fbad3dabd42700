use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::Context;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub production: bool,
    pub static_dir: PathBuf,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to a Postgres connection string")?;

        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            port: try_load("PORT", "3005")?,
            production: is_production(&environment),
            static_dir: PathBuf::from(try_load::<String>("STATIC_DIR", "build")?),
            max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
        })
    }
}

pub fn is_production(environment: &str) -> bool {
    environment.trim().eq_ignore_ascii_case("production")
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("invalid {key} value {raw:?}: {e}")
    })
}
