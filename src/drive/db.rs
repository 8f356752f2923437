use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{Drive, File, Folder};
use crate::error::FileledgeError;

/// Storage provider backed by the `folders`, `folder_parents` and `files` tables.
#[derive(Debug, Clone)]
pub struct PgDrive {
    pool: PgPool,

    /// Base URL folder links are built from
    drive_url: String,
}

impl PgDrive {
    pub fn new(pool: PgPool, drive_url: impl Into<String>) -> Self {
        Self {
            pool,
            drive_url: drive_url.into(),
        }
    }

    fn folder_url(&self, id: &str) -> String {
        format!("{}/drive/folders/{id}", self.drive_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Drive for PgDrive {
    async fn folder(&self, id: &str) -> Result<Folder, FileledgeError> {
        sqlx::query_as::<_, Folder>("SELECT id, name, url FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| FileledgeError::NotFound(format!("folder {id}")))
    }

    async fn file(&self, id: &str) -> Result<File, FileledgeError> {
        sqlx::query_as::<_, File>(
            "SELECT id, name, mime_type, size, url, updated_at FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| FileledgeError::NotFound(format!("file {id}")))
    }

    async fn child_folders(&self, id: &str) -> Result<Vec<Folder>, FileledgeError> {
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT f.id, f.name, f.url
            FROM folders f
            INNER JOIN folder_parents p
            ON p.folder_id = f.id AND p.parent_id = $1
            ORDER BY p.created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(FileledgeError::from)
    }

    async fn has_child_folders(&self, id: &str) -> Result<bool, FileledgeError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM folder_parents WHERE parent_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(FileledgeError::from)
    }

    async fn child_files(&self, id: &str) -> Result<Vec<File>, FileledgeError> {
        sqlx::query_as::<_, File>(
            "SELECT id, name, mime_type, size, url, updated_at FROM files WHERE folder_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(FileledgeError::from)
    }

    async fn parents(&self, id: &str) -> Result<Vec<Folder>, FileledgeError> {
        sqlx::query_as::<_, Folder>(
            r#"
            SELECT f.id, f.name, f.url
            FROM folders f
            INNER JOIN folder_parents p
            ON p.parent_id = f.id AND p.folder_id = $1
            ORDER BY p.created_at
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(FileledgeError::from)
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<Folder, FileledgeError> {
        let mut tx = self.pool.begin().await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM folders WHERE id = $1)")
                .bind(parent)
                .fetch_one(&mut *tx)
                .await?;

        if !exists {
            return Err(FileledgeError::NotFound(format!("folder {parent}")));
        }

        let id = uuid::Uuid::new_v4().to_string();

        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders(id, name, url) VALUES($1, $2, $3) RETURNING id, name, url",
        )
        .bind(&id)
        .bind(name)
        .bind(self.folder_url(&id))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO folder_parents(folder_id, parent_id) VALUES($1, $2)")
            .bind(&id)
            .bind(parent)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!("Created folder {id} under {parent}");

        Ok(folder)
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FileledgeError> {
        let result = sqlx::query("UPDATE folders SET name = $1, updated_at = NOW() WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(FileledgeError::NotFound(format!("folder {id}")));
        }

        Ok(())
    }

    async fn move_folder(&self, id: &str, parent: &str) -> Result<(), FileledgeError> {
        let mut tx = self.pool.begin().await?;

        let detached = sqlx::query("DELETE FROM folder_parents WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO folder_parents(folder_id, parent_id) VALUES($1, $2)")
            .bind(id)
            .bind(parent)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            "Moved folder {id} under {parent}, dropped {} links",
            detached.rows_affected()
        );

        Ok(())
    }
}
