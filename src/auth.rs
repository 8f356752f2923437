use async_trait::async_trait;
use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;
use tracing::error;

use crate::error::FileledgeError;

pub mod db;

/// Source of the email addresses allowed to use the application.
#[async_trait]
pub trait AllowList: Debug + Send + Sync {
    async fn emails(&self) -> Result<Vec<String>, FileledgeError>;
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gatekeeper for every page and API call. Identity comes from a header set
/// by the fronting identity proxy; authorization is membership in the allow list.
#[derive(Debug, Clone)]
pub struct Auth {
    allow_list: Arc<dyn AllowList>,
    identity_header: String,
}

impl Auth {
    pub fn new(allow_list: Arc<dyn AllowList>, identity_header: impl Into<String>) -> Self {
        Self {
            allow_list,
            identity_header: identity_header.into(),
        }
    }

    /// The caller's email, if the identity header is present and non-empty.
    pub fn identity(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.identity_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
    }

    /// Case-insensitive, whitespace-insensitive membership check. Missing
    /// emails and unreadable allow lists deny access.
    pub async fn is_allowed(&self, email: Option<&str>) -> bool {
        let Some(email) = email.map(normalize).filter(|email| !email.is_empty()) else {
            return false;
        };

        match self.allow_list.emails().await {
            Ok(emails) => emails.iter().any(|allowed| normalize(allowed) == email),
            Err(e) => {
                error!("Unable to read allow list: {e}");
                false
            }
        }
    }

    pub async fn check(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let email = self.identity(headers);
        if !self.is_allowed(email.as_deref()).await {
            return Err(AuthError::Denied(
                email.unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        email.ok_or(AuthError::Denied("unknown".to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Your email ({0}) is not authorized")]
    Denied(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Denied(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        FileledgeError::from(self).into_response()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[derive(Debug)]
    pub struct StaticAllowList(pub Vec<&'static str>);

    #[async_trait]
    impl AllowList for StaticAllowList {
        async fn emails(&self) -> Result<Vec<String>, FileledgeError> {
            Ok(self.0.iter().map(|e| e.to_string()).collect())
        }
    }

    #[derive(Debug)]
    struct BrokenAllowList;

    #[async_trait]
    impl AllowList for BrokenAllowList {
        async fn emails(&self) -> Result<Vec<String>, FileledgeError> {
            Err(FileledgeError::NotFound("Settings".to_string()))
        }
    }

    pub fn auth() -> Auth {
        Auth::new(
            Arc::new(StaticAllowList(vec![" Alice@Example.com ", "bob@example.com"])),
            "x-forwarded-email",
        )
    }

    #[tokio::test]
    async fn allow_list_ignores_case_and_whitespace() {
        let auth = auth();

        assert!(auth.is_allowed(Some("alice@example.com")).await);
        assert!(auth.is_allowed(Some("  BOB@example.com")).await);
        assert!(!auth.is_allowed(Some("eve@example.com")).await);
        assert!(!auth.is_allowed(Some("   ")).await);
        assert!(!auth.is_allowed(None).await);
    }

    #[tokio::test]
    async fn unreadable_allow_list_denies() {
        let auth = Auth::new(Arc::new(BrokenAllowList), "x-forwarded-email");
        assert!(!auth.is_allowed(Some("alice@example.com")).await);
    }

    #[tokio::test]
    async fn check_reads_identity_header() {
        let auth = auth();

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-email", "alice@example.com".parse().unwrap());
        assert_eq!("alice@example.com", auth.check(&headers).await.unwrap());

        let err = auth.check(&HeaderMap::new()).await.unwrap_err();
        assert_eq!("Your email (unknown) is not authorized", err.to_string());
    }
}
