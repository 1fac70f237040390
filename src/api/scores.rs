//! Score API handlers
//!
//! Listing and submitting leaderboard entries.

use crate::error::AppError;
use crate::state::{ScoreRecord, ScoreSubmission, SharedState};
use axum::{body::Bytes, extract::State, response::Json};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// Acknowledgement for an accepted submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Always true; storage failures are not reported to the client
    pub success: bool,
}

/// GET /scores - List all scores, highest alerts first
pub async fn list_scores(State(state): State<SharedState>) -> Json<Vec<ScoreRecord>> {
    let state = state.read().await;
    Json(state.load_scores().await)
}

/// POST /scores - Submit a game result
///
/// The body is parsed as JSON whatever its declared content type.
pub async fn submit_score(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let record = ScoreSubmission::from_slice(&body)?.into_record(Utc::now());

    let state = state.write().await;
    info!(name = %record.name, alerts = record.alerts, "Score submitted");
    state.record_score(record).await;

    Ok(Json(SubmitResponse { success: true }))
}
