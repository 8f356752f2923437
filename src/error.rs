use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum FileledgeError {
    #[error("{0}")]
    IO(#[from] std::io::Error),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    MiniJinja(#[from] minijinja::Error),

    #[error("{0}")]
    Auth(#[from] AuthError),

    /// An identifier the storage provider could not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// A request that would violate the folder hierarchy.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),
}

impl FileledgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            FileledgeError::NotFound(_) => StatusCode::NOT_FOUND,
            FileledgeError::Validation(_) => StatusCode::BAD_REQUEST,
            FileledgeError::Auth(e) => e.status(),
            FileledgeError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            FileledgeError::IO(_)
            | FileledgeError::Migrate(_)
            | FileledgeError::Json(_)
            | FileledgeError::MiniJinja(_)
            | FileledgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FileledgeError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
