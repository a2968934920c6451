mod debug;
mod kick;
mod pages;
mod players;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use kickroster_resolver::ProfileResolver;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::request_id;

/// Request body cap for JSON endpoints.
pub const BODY_LIMIT_BYTES: usize = 300 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ProfileResolver>,
    pub players: Arc<[String]>,
    pub public_dir: PathBuf,
    pub has_secondary_key: bool,
}

/// `{ "ok": false, "error": "..." }` body with an HTTP status derived from
/// the error code.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    ok: bool,
    error: String,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            ok: false,
            error: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    fn status(&self) -> StatusCode {
        match self.code {
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/players", get(players::list_players))
        .route("/api/kick", get(kick::resolve_one))
        .route("/api/kick/batch", post(kick::resolve_batch))
        .route("/_debug", get(debug::debug_info))
}

fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/game", get(pages::game))
        .route("/solo.html", get(pages::solo_redirect))
}

pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.public_dir)
        .fallback(pages::html_extension_fallback.with_state(state.clone()));

    Router::new()
        .merge(api_router())
        .merge(page_router())
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
