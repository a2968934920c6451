//! Profile resolution endpoints: `GET /api/kick` and `POST /api/kick/batch`.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use kickroster_core::{normalize_slug, MergedProfile};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct KickResponse {
    ok: bool,
    data: MergedProfile,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum BatchItem {
    Resolved {
        ok: bool,
        data: MergedProfile,
    },
    Failed {
        ok: bool,
        slug: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct BatchResponse {
    ok: bool,
    results: Vec<BatchItem>,
}

pub(super) async fn resolve_one(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<KickResponse>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let slug = normalize_slug(first_user(&pairs).unwrap_or_default());
    if slug.is_empty() {
        return Err(ApiError::bad_request("Missing ?user="));
    }

    match state.resolver.resolve(&slug).await {
        Ok(data) => Ok(Json(KickResponse { ok: true, data })),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, slug = %slug, error = %e, "profile resolution failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}

pub(super) async fn resolve_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let users = batch_users(&body)?;
    tracing::debug!(request_id = %req_id.0, count = users.len(), "batch resolution requested");

    let results = state
        .resolver
        .resolve_batch(&users)
        .await
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(data) => BatchItem::Resolved { ok: true, data },
            Err(e) => BatchItem::Failed {
                ok: false,
                slug: outcome.slug,
                error: e.to_string(),
            },
        })
        .collect();

    Ok(Json(BatchResponse { ok: true, results }))
}

/// First `user` value in the query string; later repeats are ignored.
fn first_user(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.as_str())
}

/// Pulls the raw `users` entries out of a batch body.
///
/// A missing body, a non-object body or a `users` field that is not an
/// array yields no users. Strings and numbers are accepted as entries.
fn batch_users(body: &[u8]) -> Result<Vec<String>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;

    let Some(entries) = value.get("users").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
