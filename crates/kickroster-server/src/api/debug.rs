//! `GET /_debug`: deployment diagnostics for a misconfigured public directory
//! or missing credentials.

use std::path::Path;

use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DebugInfo {
    cwd: String,
    public_dir: String,
    files_in_public: Vec<String>,
    has_piloterr_key: bool,
    cache_entries: usize,
}

pub(super) async fn debug_info(State(state): State<AppState>) -> Json<DebugInfo> {
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let public_dir = std::path::absolute(&state.public_dir)
        .unwrap_or_else(|_| state.public_dir.clone());

    Json(DebugInfo {
        cwd,
        public_dir: public_dir.display().to_string(),
        files_in_public: list_files(&public_dir).await,
        has_piloterr_key: state.has_secondary_key,
        cache_entries: state.resolver.cache().len().await,
    })
}

/// Sorted entry names of `dir`; empty when the directory cannot be read.
async fn list_files(dir: &Path) -> Vec<String> {
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return Vec::new();
    };

    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to list public directory");
                break;
            }
        }
    }
    names.sort();
    names
}
