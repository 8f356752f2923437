use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{collections::HashMap, fmt::Debug, sync::Arc};
use tracing::info;

use self::cache::RemarksCache;
use crate::{drive::Drive, error::FileledgeError};

pub mod cache;
pub mod db;

#[cfg(test)]
pub mod memory;

/// File ID -> remark text
pub type RemarksMap = HashMap<String, String>;

/// One row of the remarks table. File metadata is denormalized into the row so
/// the table can be read on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemarkRecord {
    /// Unique key
    pub file_id: String,
    pub file_name: String,
    pub file_type: String,
    pub parent_folder_id: String,
    /// Breadcrumb string at the time of saving
    pub folder_path: String,
    pub remarks: String,
    pub last_modified: DateTime<Utc>,
    pub file_url: String,
}

/// Tabular store holding at most one [RemarkRecord] per file ID.
#[async_trait]
pub trait RemarksStore: Debug + Send + Sync {
    async fn get_all(&self) -> Result<RemarksMap, FileledgeError>;

    /// Overwrite the row keyed by `record.file_id` in place, or append it if absent.
    async fn upsert(&self, record: &RemarkRecord) -> Result<(), FileledgeError>;
}

/// Payload for saving the remarks of a single file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRemarks {
    pub file_id: String,
    pub file_name: String,
    pub file_type: String,
    pub parent_folder_id: String,
    pub folder_path: String,
    pub remarks: String,
}

#[derive(Debug, Clone)]
pub struct Remarks {
    store: Arc<dyn RemarksStore>,
    cache: Arc<RemarksCache>,
    drive: Arc<dyn Drive>,
}

impl Remarks {
    pub fn new(store: Arc<dyn RemarksStore>, cache: RemarksCache, drive: Arc<dyn Drive>) -> Self {
        Self {
            store,
            cache: Arc::new(cache),
            drive,
        }
    }

    /// All remarks, served from the cache while it is fresh. Never fails; an
    /// unreachable store yields no remarks.
    pub async fn get_all(&self) -> Arc<RemarksMap> {
        self.cache.get_all(self.store.as_ref()).await
    }

    pub async fn save(&self, request: SaveRemarks) -> Result<(), FileledgeError> {
        let SaveRemarks {
            file_id,
            file_name,
            file_type,
            parent_folder_id,
            folder_path,
            remarks,
        } = request;

        let file = self.drive.file(&file_id).await?;

        let record = RemarkRecord {
            file_id,
            file_name,
            file_type,
            parent_folder_id,
            folder_path,
            remarks,
            last_modified: file.updated_at,
            file_url: file.url,
        };

        self.store.upsert(&record).await?;
        self.cache.invalidate();

        info!("Saved remarks for {}", record.file_id);

        Ok(())
    }
}
