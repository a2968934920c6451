use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct PlayersResponse {
    ok: bool,
    players: Vec<String>,
}

pub(super) async fn list_players(State(state): State<AppState>) -> Json<PlayersResponse> {
    Json(PlayersResponse {
        ok: true,
        players: state.players.to_vec(),
    })
}
