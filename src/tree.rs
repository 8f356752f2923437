//! Upward walks over the parent graph of the drive.
//!
//! The graph comes from an external provider and may contain cycles, so every
//! walk here is bounded by [HOP_LIMIT].

use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

use crate::{drive::Drive, error::FileledgeError};

/// Maximum number of parent links followed by a single walk.
pub const HOP_LIMIT: usize = 20;

/// A single breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub id: String,
    pub name: String,
}

/// Returns `true` if `ancestor` appears in the first-parent chain of `candidate`.
///
/// Chains longer than [HOP_LIMIT] and provider failures both yield `false`.
/// A folder is not its own descendant unless a short enough cycle leads back to it.
pub async fn is_descendant_of(drive: &dyn Drive, candidate: &str, ancestor: &str) -> bool {
    match find_ancestor(drive, candidate, ancestor).await {
        Ok(found) => found,
        Err(e) => {
            debug!("Ancestor check of {candidate} failed: {e}");
            false
        }
    }
}

async fn find_ancestor(
    drive: &dyn Drive,
    candidate: &str,
    ancestor: &str,
) -> Result<bool, FileledgeError> {
    let mut current = candidate.to_string();

    for _ in 0..HOP_LIMIT {
        let Some(parent) = drive.parents(&current).await?.into_iter().next() else {
            return Ok(false);
        };

        if parent.id == ancestor {
            return Ok(true);
        }

        current = parent.id;
    }

    Ok(false)
}

/// Breadcrumbs from `root` down to `folder_id`, root first.
///
/// The root is always prepended, even when the walk gave up before reaching
/// it (folder outside the root's subtree, or deeper than [HOP_LIMIT]). In that
/// case the path is not connected. Any provider failure yields an empty path.
pub async fn resolve_path(drive: &dyn Drive, root: &str, folder_id: &str) -> Vec<Crumb> {
    match walk_to_root(drive, root, folder_id).await {
        Ok(path) => path,
        Err(e) => {
            debug!("Unable to resolve path of {folder_id}: {e}");
            vec![]
        }
    }
}

async fn walk_to_root(
    drive: &dyn Drive,
    root: &str,
    folder_id: &str,
) -> Result<Vec<Crumb>, FileledgeError> {
    let mut path = VecDeque::new();
    let mut current = drive.folder(folder_id).await?;
    let mut hops = 0;

    while current.id != root && hops < HOP_LIMIT {
        let parent = drive.parents(&current.id).await?.into_iter().next();

        path.push_front(Crumb {
            id: current.id,
            name: current.name,
        });

        let Some(parent) = parent else {
            break;
        };

        current = parent;
        hops += 1;
    }

    let root = drive.folder(root).await?;
    path.push_front(Crumb {
        id: root.id,
        name: root.name,
    });

    Ok(path.into())
}
