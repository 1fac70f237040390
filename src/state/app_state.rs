// Application state management
// Holds the score store and applies the leaderboard rules around it

use super::persistence::ScoreStore;
use super::score::ScoreRecord;
use crate::config::DEFAULT_MAX_SCORES;
use crate::services::leaderboard::{Leaderboard, ScoreStats};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

/// State shared between request handlers
///
/// Handlers take the read lock for queries and the write lock for
/// submissions, so load-modify-save cycles never interleave.
pub type SharedState = Arc<RwLock<AppState>>;

/// Main application state
pub struct AppState {
    /// Persistence backend for the leaderboard
    store: Arc<dyn ScoreStore>,
    /// Maximum number of records kept
    max_scores: usize,
}

impl AppState {
    /// Create state over `store` with the default capacity
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self::with_capacity(store, DEFAULT_MAX_SCORES)
    }

    /// Create state over `store` keeping at most `max_scores` records
    pub fn with_capacity(store: Arc<dyn ScoreStore>, max_scores: usize) -> Self {
        Self { store, max_scores }
    }

    /// Wrap the state for sharing between handlers
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Load all scores, treating unreadable storage as empty
    pub async fn load_scores(&self) -> Vec<ScoreRecord> {
        match self.store.load().await {
            Ok(scores) => scores,
            Err(e) => {
                warn!("Failed to load scores, serving an empty leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    /// Statistics over the current scores
    pub async fn stats(&self) -> ScoreStats {
        Leaderboard::stats(&self.load_scores().await)
    }

    /// Add a record to the leaderboard and persist the result
    ///
    /// A failed save is logged and otherwise ignored; the caller still
    /// reports success. Returns the number of records on the board.
    pub async fn record_score(&self, record: ScoreRecord) -> usize {
        let mut scores = self.load_scores().await;
        let dropped = Leaderboard::insert(&mut scores, record, self.max_scores);
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Trimmed leaderboard to capacity");
        }

        if let Err(e) = self.store.save(&scores).await {
            error!("Failed to save scores: {}", e);
        }
        scores.len()
    }
}
