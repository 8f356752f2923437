use serde::Serialize;
use tracing::{error, info};

use crate::{error::FileledgeError, state::Explorer, tree::is_descendant_of};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFolder {
    pub id: String,
    pub name: String,
    pub url: String,
    pub has_subfolders: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootInfo {
    pub id: String,
    pub name: String,
    pub url: String,
}

fn folder_name(name: &str) -> Result<&str, FileledgeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FileledgeError::Validation(
            "Folder name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

impl Explorer {
    pub async fn root_info(&self) -> Result<RootInfo, FileledgeError> {
        let root = self.drive.folder(&self.root).await.map_err(|e| {
            error!("Unable to read root folder {}: {e}", self.root);
            FileledgeError::Config(
                "Invalid root folder ID. Please update root_folder_id in the configuration"
                    .to_string(),
            )
        })?;

        Ok(RootInfo {
            id: root.id,
            name: root.name,
            url: root.url,
        })
    }

    /// Create `name` under `parent` (the root if absent).
    pub async fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<CreatedFolder, FileledgeError> {
        let name = folder_name(name)?;
        let parent = self.or_root(parent);

        let folder = self.drive.create_folder(parent, name).await?;

        info!("Created folder '{}' ({}) in {parent}", folder.name, folder.id);

        Ok(CreatedFolder {
            id: folder.id,
            name: folder.name,
            url: folder.url,
            has_subfolders: false,
        })
    }

    pub async fn rename_folder(&self, id: &str, name: &str) -> Result<String, FileledgeError> {
        let name = folder_name(name)?;

        self.drive.rename_folder(id, name).await?;

        info!("Renamed folder {id} to '{name}'");

        Ok(format!("Folder renamed to \"{name}\""))
    }

    /// Detach `source` from all of its parents and attach it under `target`.
    ///
    /// Moving a folder into itself or into its own subtree is rejected.
    pub async fn move_folder(&self, source: &str, target: &str) -> Result<String, FileledgeError> {
        if source.is_empty() || target.is_empty() {
            return Err(FileledgeError::Validation("Invalid folder IDs".to_string()));
        }

        if source == target {
            return Err(FileledgeError::Validation(
                "Cannot move folder into itself".to_string(),
            ));
        }

        if is_descendant_of(self.drive.as_ref(), target, source).await {
            return Err(FileledgeError::Validation(
                "Cannot move folder into its subfolder".to_string(),
            ));
        }

        let source = self.drive.folder(source).await?;
        let target = self.drive.folder(target).await?;

        self.drive.move_folder(&source.id, &target.id).await?;

        info!("Moved folder {} into {}", source.id, target.id);

        Ok(format!("Moved to \"{}\"", target.name))
    }
}
