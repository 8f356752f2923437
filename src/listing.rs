use chrono::SecondsFormat;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    drive::{File, Folder},
    error::FileledgeError,
    remarks::RemarksMap,
    state::Explorer,
    tree::{resolve_path, Crumb},
};

/// Width requested from the thumbnail endpoint
pub const THUMBNAIL_SIZE: &str = "w400";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub has_subfolders: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: i64,
    /// ISO-8601, millisecond precision, UTC
    pub last_modified: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub remarks: String,
}

impl FileNode {
    pub fn new(file: File, remarks: &RemarksMap, drive_url: &str) -> Self {
        let File {
            id,
            name,
            mime_type,
            size,
            url,
            updated_at,
        } = file;

        Self {
            thumbnail_url: thumbnail_url(drive_url, &id, &mime_type),
            remarks: remarks.get(&id).cloned().unwrap_or_default(),
            last_modified: updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            id,
            name,
            mime_type,
            size,
            url,
        }
    }
}

/// Only images and videos get a thumbnail.
pub fn thumbnail_url(drive_url: &str, file_id: &str, mime_type: &str) -> Option<String> {
    if !(mime_type.starts_with("image/") || mime_type.starts_with("video/")) {
        return None;
    }

    Some(format!(
        "{}/thumbnail?id={file_id}&sz={THUMBNAIL_SIZE}",
        drive_url.trim_end_matches('/')
    ))
}

/// Primary collation key: canonically decomposed, accents dropped, lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Orders names the way a reader expects: accents and case only break ties.
/// Falls back to the exact names so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListing {
    pub folders: Vec<FolderNode>,
    pub files: Vec<FileNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_folder: Option<Crumb>,
    pub folder_path: Vec<Crumb>,
}

impl Explorer {
    async fn folder_node(&self, folder: Folder) -> Result<FolderNode, FileledgeError> {
        let has_subfolders = self.drive.has_child_folders(&folder.id).await?;
        Ok(FolderNode {
            id: folder.id,
            name: folder.name,
            has_subfolders,
        })
    }

    /// Direct child folders and files of `folder_id` (the root if absent),
    /// both sorted by name, with remarks joined onto the files.
    pub async fn list(&self, folder_id: Option<&str>) -> Result<FolderListing, FileledgeError> {
        let folder_id = self.or_root(folder_id);
        let folder = self.drive.folder(folder_id).await?;

        let remarks = self.remarks.get_all().await;

        let mut folders = vec![];
        for child in self.drive.child_folders(&folder.id).await? {
            folders.push(self.folder_node(child).await?);
        }

        let mut files = self
            .drive
            .child_files(&folder.id)
            .await?
            .into_iter()
            .map(|file| FileNode::new(file, &remarks, &self.drive_url))
            .collect::<Vec<_>>();

        folders.sort_by(|a, b| compare_names(&a.name, &b.name));
        files.sort_by(|a, b| compare_names(&a.name, &b.name));

        debug!(
            "Listed {}: {} folders, {} files",
            folder.id,
            folders.len(),
            files.len()
        );

        let folder_path = resolve_path(self.drive.as_ref(), &self.root, &folder.id).await;

        Ok(FolderListing {
            folders,
            files,
            current_folder: Some(Crumb {
                id: folder.id,
                name: folder.name,
            }),
            folder_path,
        })
    }
}
