//! API module
//!
//! Contains the HTTP router and request handlers for the score endpoints

pub mod middleware;
pub mod scores;
pub mod stats;

use crate::error::AppError;
use crate::state::SharedState;
use axum::{routing::get, Router};

/// Build the application router
///
/// Any method or path not listed here falls through to [`not_found`].
/// `HEAD` is routed there explicitly, since axum would otherwise answer it
/// with the `GET` handler.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/scores",
            get(scores::list_scores)
                .post(scores::submit_score)
                .head(not_found)
                .fallback(not_found),
        )
        .route(
            "/stats",
            get(stats::get_stats).head(not_found).fallback(not_found),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::exact_target_middleware))
        .layer(axum::middleware::from_fn(middleware::cors_middleware))
        .with_state(state)
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound
}
