use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db;

/// Process-wide infrastructure handed to every handler.
pub struct AppState {
    pub pool: PgPool,
    pub production: bool,
}

impl AppState {
    pub fn new(pool: PgPool, production: bool) -> Arc<Self> {
        Arc::new(Self { pool, production })
    }

    pub async fn connect(config: &Config) -> anyhow::Result<Arc<Self>> {
        let pool = db::connect(config).await?;
        Ok(Self::new(pool, config.production))
    }
}
