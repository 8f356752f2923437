use async_trait::async_trait;
use sqlx::PgPool;

use super::{RemarkRecord, RemarksMap, RemarksStore};
use crate::error::FileledgeError;

#[derive(Debug, Clone)]
pub struct PgRemarks {
    pool: PgPool,
}

impl PgRemarks {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RemarksStore for PgRemarks {
    async fn get_all(&self) -> Result<RemarksMap, FileledgeError> {
        Ok(
            sqlx::query_as::<_, (String, String)>("SELECT file_id, remarks FROM remarks")
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .filter(|(file_id, _)| !file_id.is_empty())
                .collect(),
        )
    }

    async fn upsert(&self, record: &RemarkRecord) -> Result<(), FileledgeError> {
        let RemarkRecord {
            file_id,
            file_name,
            file_type,
            parent_folder_id,
            folder_path,
            remarks,
            last_modified,
            file_url,
        } = record;

        sqlx::query(
            r#"
            INSERT INTO remarks(
                file_id, file_name, file_type, parent_folder_id,
                folder_path, remarks, last_modified, file_url
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (file_id) DO UPDATE SET
                file_name = EXCLUDED.file_name,
                file_type = EXCLUDED.file_type,
                parent_folder_id = EXCLUDED.parent_folder_id,
                folder_path = EXCLUDED.folder_path,
                remarks = EXCLUDED.remarks,
                last_modified = EXCLUDED.last_modified,
                file_url = EXCLUDED.file_url
            "#,
        )
        .bind(file_id)
        .bind(file_name)
        .bind(file_type)
        .bind(parent_folder_id)
        .bind(folder_path)
        .bind(remarks)
        .bind(last_modified)
        .bind(file_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
