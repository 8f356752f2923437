//! JSON operations behind the management page.
//!
//! Operation failures never surface as HTTP errors. Every response carries
//! `success`, failed ones an `error` message plus empty collections where the
//! operation returns any.

use crate::{
    error::FileledgeError,
    folders::{CreatedFolder, RootInfo},
    listing::{FileNode, FolderListing, FolderNode},
    remarks::SaveRemarks,
    search::{SearchOutcome, SearchResults},
    state::AppState,
    tree::Crumb,
};
use axum::{
    extract::{Path, Query, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub(super) fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/root", get(root_info))
        .route("/api/folders", get(list_root).post(create_folder))
        .route("/api/folders/:id", get(list_folder))
        .route("/api/folders/:id/rename", post(rename_folder))
        .route("/api/folders/:id/move", post(move_folder))
        .route("/api/search", get(search))
        .route("/api/remarks", post(save_remarks))
        .layer(middleware::from_fn_with_state(state, access_check))
}

async fn access_check(
    state: State<AppState>,
    headers: HeaderMap,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, FileledgeError> {
    let email = state.auth.check(&headers).await?;
    debug!("{email}: {} {}", req.method(), req.uri());
    Ok(next.run(req).await)
}

#[derive(Debug, Default, Serialize)]
pub struct Empty {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyListing {
    folders: Vec<FolderNode>,
    files: Vec<FileNode>,
    folder_path: Vec<Crumb>,
}

#[derive(Debug, Default, Serialize)]
pub struct EmptySearch {
    results: SearchResults,
}

/// Response envelope. `E` is what a failed operation carries besides its error.
#[derive(Debug, Serialize)]
pub struct Reply<T, E = Empty> {
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(flatten)]
    body: Option<T>,

    #[serde(flatten)]
    empty: Option<E>,
}

impl<T, E: Default> From<Result<T, FileledgeError>> for Reply<T, E> {
    fn from(result: Result<T, FileledgeError>) -> Self {
        match result {
            Ok(body) => Self {
                success: true,
                error: None,
                body: Some(body),
                empty: None,
            },
            Err(e) => {
                warn!("Operation failed: {e}");
                Self {
                    success: false,
                    error: Some(e.to_string()),
                    body: None,
                    empty: Some(E::default()),
                }
            }
        }
    }
}

impl<T: Serialize, E: Serialize> IntoResponse for Reply<T, E> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    message: String,
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    folder: CreatedFolder,
}

async fn root_info(state: State<AppState>) -> Reply<RootInfo> {
    state.explorer.root_info().await.into()
}

async fn list_root(state: State<AppState>) -> Reply<FolderListing, EmptyListing> {
    state.explorer.list(None).await.into()
}

async fn list_folder(
    state: State<AppState>,
    id: Path<String>,
) -> Reply<FolderListing, EmptyListing> {
    state.explorer.list(Some(id.as_str())).await.into()
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    folder: Option<String>,
}

async fn search(
    state: State<AppState>,
    params: Query<SearchParams>,
) -> Reply<SearchOutcome, EmptySearch> {
    state
        .explorer
        .search(&params.q, params.folder.as_deref())
        .await
        .into()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolder {
    name: String,
    parent_id: Option<String>,
}

async fn create_folder(state: State<AppState>, body: Json<CreateFolder>) -> Reply<Created> {
    state
        .explorer
        .create_folder(&body.name, body.parent_id.as_deref())
        .await
        .map(|folder| Created { folder })
        .into()
}

#[derive(Debug, Deserialize)]
struct RenameFolder {
    name: String,
}

async fn rename_folder(
    state: State<AppState>,
    id: Path<String>,
    body: Json<RenameFolder>,
) -> Reply<Message> {
    state
        .explorer
        .rename_folder(&id, &body.name)
        .await
        .map(Message::from)
        .into()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveFolder {
    target_id: String,
}

async fn move_folder(
    state: State<AppState>,
    id: Path<String>,
    body: Json<MoveFolder>,
) -> Reply<Message> {
    state
        .explorer
        .move_folder(&id, &body.target_id)
        .await
        .map(Message::from)
        .into()
}

async fn save_remarks(state: State<AppState>, body: Json<SaveRemarks>) -> Reply<Message> {
    state
        .explorer
        .remarks
        .save(body.0)
        .await
        .map(|_| Message::from("Remarks saved".to_string()))
        .into()
}
