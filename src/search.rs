use async_recursion::async_recursion;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::{
    drive::{Drive, Folder},
    error::FileledgeError,
    listing::{FileNode, FolderNode},
    remarks::RemarksMap,
    state::Explorer,
};

/// Search stops recording matches once this many were found.
pub const MAX_RESULTS: usize = 50;

/// Joins folder names in breadcrumb strings
pub const PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Serialize)]
pub struct FolderMatch {
    #[serde(flatten)]
    pub folder: FolderNode,

    /// Breadcrumb string ending with the folder itself
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMatch {
    #[serde(flatten)]
    pub file: FileNode,

    /// Breadcrumb string of the containing folder
    pub path: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    pub folders: Vec<FolderMatch>,
    pub files: Vec<FileMatch>,
}

#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub results: SearchResults,
    pub query: String,
    /// Whether the result cap was reached
    pub limited: bool,
}

/// State of a single depth-first traversal.
struct Search<'a> {
    explorer: &'a Explorer,

    /// Lower-cased query
    needle: String,

    remarks: &'a RemarksMap,

    cap: usize,

    found: usize,

    /// Folders already entered. The parent graph may loop back on itself.
    visited: HashSet<String>,

    results: SearchResults,
}

impl<'a> Search<'a> {
    fn exhausted(&self) -> bool {
        self.found >= self.cap
    }

    fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.needle)
    }

    fn drive(&self) -> &'a dyn Drive {
        self.explorer.drive.as_ref()
    }

    /// Pre-order walk of `folder_id`. A folder that cannot be read contributes
    /// nothing further, its siblings are still searched.
    #[async_recursion]
    async fn visit(&mut self, folder_id: &str, path: &str) {
        if self.exhausted() {
            return;
        }

        if let Err(e) = self.search_folder(folder_id, path).await {
            debug!("Skipping the rest of {folder_id}: {e}");
        }
    }

    async fn search_folder(&mut self, folder_id: &str, path: &str) -> Result<(), FileledgeError> {
        for Folder { id, name, .. } in self.drive().child_folders(folder_id).await? {
            if self.exhausted() {
                break;
            }

            if !self.visited.insert(id.clone()) {
                continue;
            }

            let folder_path = format!("{path}{PATH_SEPARATOR}{name}");

            if self.matches(&name) {
                let has_subfolders = self.drive().has_child_folders(&id).await?;
                self.results.folders.push(FolderMatch {
                    folder: FolderNode {
                        id: id.clone(),
                        name,
                        has_subfolders,
                    },
                    path: folder_path.clone(),
                });
                self.found += 1;
            }

            self.visit(&id, &folder_path).await;
        }

        for file in self.drive().child_files(folder_id).await? {
            if self.exhausted() {
                break;
            }

            if self.matches(&file.name) {
                self.results.files.push(FileMatch {
                    file: FileNode::new(file, self.remarks, &self.explorer.drive_url),
                    path: path.to_string(),
                });
                self.found += 1;
            }
        }

        Ok(())
    }
}

impl Explorer {
    /// Case-insensitive substring search over folder and file names in the
    /// subtree of `start` (the root if absent), capped at [MAX_RESULTS].
    pub async fn search(
        &self,
        query: &str,
        start: Option<&str>,
    ) -> Result<SearchOutcome, FileledgeError> {
        self.search_capped(query, start, MAX_RESULTS).await
    }

    pub(crate) async fn search_capped(
        &self,
        query: &str,
        start: Option<&str>,
        cap: usize,
    ) -> Result<SearchOutcome, FileledgeError> {
        let start = self.drive.folder(self.or_root(start)).await?;
        let remarks = self.remarks.get_all().await;

        let mut search = Search {
            explorer: self,
            needle: query.to_lowercase(),
            remarks: &remarks,
            cap,
            found: 0,
            visited: HashSet::from([start.id.clone()]),
            results: SearchResults::default(),
        };

        search.visit(&start.id, &start.name).await;

        let limited = search.exhausted();

        info!(
            "Search for '{query}' in {} found {} results{}",
            start.id,
            search.found,
            if limited { " (limited)" } else { "" }
        );

        Ok(SearchOutcome {
            results: search.results,
            query: query.to_string(),
            limited,
        })
    }
}
