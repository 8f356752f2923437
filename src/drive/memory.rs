//! In-memory storage provider used by tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::{collections::HashSet, sync::Mutex};

use super::{Drive, File, Folder};
use crate::error::FileledgeError;

#[derive(Debug, Default)]
struct Tree {
    folders: Vec<Folder>,

    /// (child, parent) in link order
    links: Vec<(String, String)>,

    /// (parent, file) in insertion order
    files: Vec<(String, File)>,

    /// Folders whose contents cannot be read
    broken: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct MemoryDrive {
    tree: Mutex<Tree>,
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

impl MemoryDrive {
    pub fn with_root(id: &str, name: &str) -> Self {
        let drive = Self::default();
        drive.insert_folder(id, name);
        drive
    }

    fn insert_folder(&self, id: &str, name: &str) {
        self.tree.lock().unwrap().folders.push(Folder {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://drive.test/drive/folders/{id}"),
        });
    }

    pub fn add_folder(&self, parent: &str, id: &str, name: &str) {
        self.insert_folder(id, name);
        self.link(id, parent);
    }

    /// Adds a folder with no parent at all.
    pub fn add_orphan(&self, id: &str, name: &str) {
        self.insert_folder(id, name);
    }

    pub fn link(&self, child: &str, parent: &str) {
        self.tree
            .lock()
            .unwrap()
            .links
            .push((child.to_string(), parent.to_string()));
    }

    pub fn add_file(&self, parent: &str, id: &str, name: &str, mime_type: &str) {
        self.tree.lock().unwrap().files.push((
            parent.to_string(),
            File {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                size: 1024,
                url: format!("https://drive.test/file/d/{id}/view"),
                updated_at: timestamp(),
            },
        ));
    }

    pub fn break_folder(&self, id: &str) {
        self.tree.lock().unwrap().broken.insert(id.to_string());
    }

    pub fn parent_ids(&self, id: &str) -> Vec<String> {
        self.tree
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|(child, _)| child == id)
            .map(|(_, parent)| parent.clone())
            .collect()
    }

    fn find_folder(tree: &Tree, id: &str) -> Result<Folder, FileledgeError> {
        tree.folders
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| FileledgeError::NotFound(format!("folder {id}")))
    }

    fn readable(tree: &Tree, id: &str) -> Result<(), FileledgeError> {
        Self::find_folder(tree, id)?;
        if tree.broken.contains(id) {
            return Err(FileledgeError::IO(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("folder {id} is unreadable"),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Drive for MemoryDrive {
    async fn folder(&self, id: &str) -> Result<Folder, FileledgeError> {
        Self::find_folder(&self.tree.lock().unwrap(), id)
    }

    async fn file(&self, id: &str) -> Result<File, FileledgeError> {
        self.tree
            .lock()
            .unwrap()
            .files
            .iter()
            .find(|(_, f)| f.id == id)
            .map(|(_, f)| f.clone())
            .ok_or_else(|| FileledgeError::NotFound(format!("file {id}")))
    }

    async fn child_folders(&self, id: &str) -> Result<Vec<Folder>, FileledgeError> {
        let tree = self.tree.lock().unwrap();
        Self::readable(&tree, id)?;
        tree.links
            .iter()
            .filter(|(_, parent)| parent == id)
            .map(|(child, _)| Self::find_folder(&tree, child))
            .collect()
    }

    async fn has_child_folders(&self, id: &str) -> Result<bool, FileledgeError> {
        let tree = self.tree.lock().unwrap();
        Self::find_folder(&tree, id)?;
        Ok(tree.links.iter().any(|(_, parent)| parent == id))
    }

    async fn child_files(&self, id: &str) -> Result<Vec<File>, FileledgeError> {
        let tree = self.tree.lock().unwrap();
        Self::readable(&tree, id)?;
        Ok(tree
            .files
            .iter()
            .filter(|(parent, _)| parent == id)
            .map(|(_, f)| f.clone())
            .collect())
    }

    async fn parents(&self, id: &str) -> Result<Vec<Folder>, FileledgeError> {
        let tree = self.tree.lock().unwrap();
        Self::find_folder(&tree, id)?;
        tree.links
            .iter()
            .filter(|(child, _)| child == id)
            .map(|(_, parent)| Self::find_folder(&tree, parent))
            .collect()
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<Folder, FileledgeError> {
        Self::find_folder(&self.tree.lock().unwrap(), parent)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.add_folder(parent, &id, name);
        self.folder(&id).await
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FileledgeError> {
        let mut tree = self.tree.lock().unwrap();
        let folder = tree
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| FileledgeError::NotFound(format!("folder {id}")))?;
        folder.name = name.to_string();
        Ok(())
    }

    async fn move_folder(&self, id: &str, parent: &str) -> Result<(), FileledgeError> {
        let mut tree = self.tree.lock().unwrap();
        Self::find_folder(&tree, id)?;
        Self::find_folder(&tree, parent)?;
        tree.links.retain(|(child, _)| child != id);
        tree.links.push((id.to_string(), parent.to_string()));
        Ok(())
    }
}
