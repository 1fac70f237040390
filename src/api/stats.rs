//! Statistics API handler

use crate::services::leaderboard::ScoreStats;
use crate::state::SharedState;
use axum::{extract::State, response::Json};

/// GET /stats - Aggregate statistics over all stored scores
pub async fn get_stats(State(state): State<SharedState>) -> Json<ScoreStats> {
    let state = state.read().await;
    Json(state.stats().await)
}
