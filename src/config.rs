use crate::error::FileledgeError;
use clap::Parser;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Parser)]
pub struct StartArgs {
    #[arg(short, long, default_value = "config.json")]
    pub config_path: String,

    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    #[arg(short, long, default_value = "INFO")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The folder bounding all navigation. Nothing above it is ever exposed.
    pub root_folder_id: String,

    /// The document title for the front end
    pub title: Option<String>,

    /// Header set by the fronting identity proxy carrying the caller's email.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Base URL of the hosted drive. Thumbnail and folder links are built from it.
    #[serde(default = "default_drive_url")]
    pub drive_url: String,
}

fn default_identity_header() -> String {
    "x-forwarded-email".to_string()
}

fn default_drive_url() -> String {
    "https://drive.google.com".to_string()
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, FileledgeError> {
        let config = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&config)?;

        if config.root_folder_id.trim().is_empty() {
            return Err(FileledgeError::Config(
                "root_folder_id must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config: Config = serde_json::from_str(r#"{ "root_folder_id": "root" }"#).unwrap();

        assert_eq!("root", config.root_folder_id);
        assert_eq!("x-forwarded-email", config.identity_header);
        assert_eq!("https://drive.google.com", config.drive_url);
        assert!(config.title.is_none());
    }

    #[test]
    fn config_rejects_empty_root() {
        let path = std::env::temp_dir().join(format!("fileledge-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "root_folder_id": "  " }"#).unwrap();

        let result = Config::read(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(FileledgeError::Config(_))));
    }
}
