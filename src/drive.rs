use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use crate::error::FileledgeError;

pub mod db;

#[cfg(test)]
pub mod memory;

/// A folder as reported by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A file as reported by the storage provider.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct File {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: i64,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// The hierarchical file storage everything else is layered over.
///
/// Identifiers are opaque. A folder may have any number of parents and the
/// parent graph is not guaranteed to be acyclic, so callers walking it must
/// bound their traversal.
#[async_trait]
pub trait Drive: Debug + Send + Sync {
    async fn folder(&self, id: &str) -> Result<Folder, FileledgeError>;

    async fn file(&self, id: &str) -> Result<File, FileledgeError>;

    /// Direct child folders of `id`.
    async fn child_folders(&self, id: &str) -> Result<Vec<Folder>, FileledgeError>;

    /// Whether `id` has at least one child folder, without enumerating them.
    async fn has_child_folders(&self, id: &str) -> Result<bool, FileledgeError>;

    /// Files directly contained in `id`.
    async fn child_files(&self, id: &str) -> Result<Vec<File>, FileledgeError>;

    /// Parents of the folder `id`, oldest link first.
    async fn parents(&self, id: &str) -> Result<Vec<Folder>, FileledgeError>;

    async fn create_folder(&self, parent: &str, name: &str) -> Result<Folder, FileledgeError>;

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FileledgeError>;

    /// Detach `id` from all of its parents and link it under `parent`, as a
    /// single change. On failure the existing links are left as they were.
    async fn move_folder(&self, id: &str, parent: &str) -> Result<(), FileledgeError>;
}
