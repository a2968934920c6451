//! HTML pages served from the public directory.

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::AppState;

pub(super) async fn index(State(state): State<AppState>, req: Request) -> Response {
    let index = state.public_dir.join("index.html");
    if !is_file(&index).await {
        return missing_file(&state.public_dir, &index);
    }
    serve_file(&index, req).await
}

/// Serves `game.html`, falling back to the legacy `solo.html`.
pub(super) async fn game(State(state): State<AppState>, req: Request) -> Response {
    let game = state.public_dir.join("game.html");
    let solo = state.public_dir.join("solo.html");

    for candidate in [&game, &solo] {
        if is_file(candidate).await {
            return serve_file(candidate, req).await;
        }
    }
    missing_file(&state.public_dir, &game)
}

/// Old links to `/solo.html` land on `/game` with a plain 302.
pub(super) async fn solo_redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/game")])
}

/// Runs after the static file service finds nothing: retries the path with
/// an `.html` extension before giving up with 404.
pub(super) async fn html_extension_fallback(State(state): State<AppState>, req: Request) -> Response {
    let candidate = html_candidate(&state.public_dir, req.uri().path());
    match candidate {
        Some(path) if is_file(&path).await => serve_file(&path, req).await,
        _ => (StatusCode::NOT_FOUND, format!("Cannot GET {}", req.uri().path())).into_response(),
    }
}

/// Maps a request path onto `<public_dir>/<path>.html`.
///
/// Returns `None` for the root, directory paths, paths already ending in
/// `.html`, and anything that could escape the public directory.
fn html_candidate(public_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let relative = uri_path.trim_start_matches('/');
    if relative.is_empty()
        || relative.ends_with('/')
        || relative.ends_with(".html")
        || relative.contains(['\\', '%', ':'])
    {
        return None;
    }

    let relative = Path::new(relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut file = public_dir.join(relative).into_os_string();
    file.push(".html");
    Some(PathBuf::from(file))
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

async fn serve_file(path: &Path, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

fn missing_file(public_dir: &Path, missing: &Path) -> Response {
    tracing::error!(path = %missing.display(), "static page missing");
    let body = format!(
        "Missing file:\n{missing}\n\n\
         Fix:\n\
         - create the public directory\n\
         - put \"index.html\" (and \"game.html\") inside it\n\n\
         Expected:\n{expected}\n",
        missing = missing.display(),
        expected = public_dir.join("index.html").display(),
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
