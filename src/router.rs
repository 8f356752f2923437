use crate::{error::FileledgeError, state::AppState};
use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_macros::debug_handler;
use minijinja::context;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use self::api::api_router;

mod api;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .nest_service("/public", ServeDir::new("public"))
        .route("/", get(index))
        .route("/healthz", get(health))
        .merge(api_router(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serves the management page to allowed users and an access denied notice
/// to everybody else.
#[debug_handler]
async fn index(
    state: State<AppState>,
    headers: HeaderMap,
) -> Result<Response, FileledgeError> {
    let email = state.auth.identity(&headers);

    if !state.auth.is_allowed(email.as_deref()).await {
        let email = email.as_deref().unwrap_or("unknown");
        warn!("Denied access for {email}");
        let page = state
            .pages
            .get_template("denied.html")?
            .render(context! { email => email })?;
        return Ok((StatusCode::FORBIDDEN, Html(page)).into_response());
    }

    info!("Serving index to {}", email.as_deref().unwrap_or_default());

    let page = state
        .pages
        .get_template("index.html")?
        .render(context! { title => state.title.as_str() })?;

    Ok(Html(page).into_response())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fileledge",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
