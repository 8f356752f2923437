use minijinja::Environment;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    auth::{db::AllowListDb, Auth},
    config::Config,
    drive::{db::PgDrive, Drive},
    error::FileledgeError,
    remarks::{
        cache::{RemarksCache, FRESHNESS_WINDOW},
        db::PgRemarks,
        Remarks,
    },
};

const INDEX: &str = include_str!("../public/index.html");

const DENIED: &str = r#"<!DOCTYPE html>
<html>
<head><title>Access Restricted</title></head>
<body>
<h3>Access denied</h3>
<p>Your email ({{ email }}) is not authorized.</p>
</body>
</html>
"#;

/// Navigation, search and mutation over the drive, bounded by a single root
/// folder. Operations are implemented in [crate::listing], [crate::search] and
/// [crate::folders].
#[derive(Debug, Clone)]
pub struct Explorer {
    pub drive: Arc<dyn Drive>,

    pub remarks: Remarks,

    /// Configured root folder ID
    pub root: String,

    /// Base URL thumbnails are built from
    pub drive_url: String,
}

impl Explorer {
    pub fn new(
        drive: Arc<dyn Drive>,
        remarks: Remarks,
        root: impl Into<String>,
        drive_url: impl Into<String>,
    ) -> Self {
        Self {
            drive,
            remarks,
            root: root.into(),
            drive_url: drive_url.into(),
        }
    }

    /// Missing and empty IDs both mean the root.
    pub fn or_root<'a>(&'a self, id: Option<&'a str>) -> &'a str {
        match id {
            Some(id) if !id.is_empty() => id,
            _ => &self.root,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub explorer: Explorer,

    pub auth: Auth,

    pub pages: Arc<Environment<'static>>,

    /// The document title for the front end
    pub title: String,
}

impl AppState {
    pub fn new(explorer: Explorer, auth: Auth, title: Option<String>) -> Result<Self, FileledgeError> {
        let mut pages = Environment::new();
        pages.add_template("index.html", INDEX)?;
        pages.add_template("denied.html", DENIED)?;

        Ok(Self {
            explorer,
            auth,
            pages: Arc::new(pages),
            title: title.unwrap_or_else(|| "Multimedia Management System".to_string()),
        })
    }

    /// Wire up the Postgres backed drive, remarks table and allow list.
    pub fn connect(config: Config, pool: PgPool) -> Result<Self, FileledgeError> {
        let Config {
            root_folder_id,
            title,
            identity_header,
            drive_url,
        } = config;

        let drive: Arc<dyn Drive> = Arc::new(PgDrive::new(pool.clone(), drive_url.clone()));

        let remarks = Remarks::new(
            Arc::new(PgRemarks::new(pool.clone())),
            RemarksCache::new(FRESHNESS_WINDOW),
            drive.clone(),
        );

        let explorer = Explorer::new(drive, remarks, root_folder_id, drive_url);
        let auth = Auth::new(Arc::new(AllowListDb::new(pool)), identity_header);

        Self::new(explorer, auth, title)
    }
}
