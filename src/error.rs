//! Error types and error handling for the application
//!
//! Errors that reach a client are converted to HTTP responses via `IntoResponse`.
//! Storage failures never get here: reads are masked as an empty leaderboard and
//! write failures are logged.

use crate::state::SubmissionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Submission body could not be parsed
    #[error("Invalid data: {0}")]
    InvalidData(#[from] SubmissionError),

    /// No route matches the request method and path
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidData(e) => {
                tracing::debug!("Rejected submission: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid data" })),
                )
                    .into_response()
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    }
}
