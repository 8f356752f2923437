use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::error::FileledgeError;

pub async fn create_pool(url: &str) -> Result<PgPool, FileledgeError> {
    let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;
    info!("Connected to database");
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> Result<(), FileledgeError> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
