use async_trait::async_trait;
use sqlx::PgPool;

use super::AllowList;
use crate::error::FileledgeError;

#[derive(Debug, Clone)]
pub struct AllowListDb {
    pool: sqlx::PgPool,
}

impl AllowListDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AllowList for AllowListDb {
    async fn emails(&self) -> Result<Vec<String>, FileledgeError> {
        sqlx::query_scalar::<_, String>("SELECT email FROM allowed_emails WHERE email <> ''")
            .fetch_all(&self.pool)
            .await
            .map_err(FileledgeError::from)
    }
}
